//! Optional JSON dumps of the flattened detection list.
//!
//! [`ScoreSnapshot`] keeps only the decision values; [`DetectionListing`]
//! keeps every flattened detection with its image-space box for audit. The
//! detector never writes either on its own; callers ask for them explicitly
//! (the CLI does so when `output.snapshot_out` or
//! `output.all_detections_out` is set).
use crate::diagnostics::DetectionReport;
use crate::image::io::{read_json_file, write_json_file};
use crate::types::Detection;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Decision values of every flattened detection, in flattened order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSnapshot {
    pub image_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub scores: Vec<f32>,
}

impl ScoreSnapshot {
    /// Capture the original (unsuppressed) scores of `detections`.
    pub fn from_detections(image_id: impl Into<String>, detections: &[Detection]) -> Self {
        Self {
            image_id: image_id.into(),
            model: None,
            scores: detections.iter().map(|d| d.score).collect(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn write_json(&self, path: &Path) -> Result<(), String> {
        write_json_file(path, self)
    }

    pub fn read_json(path: &Path) -> Result<Self, String> {
        read_json_file(path)
    }
}

/// Every flattened (unsuppressed) detection of one run, in flattened order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionListing {
    pub image_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub detections: Vec<Detection>,
}

impl DetectionListing {
    pub fn from_report(report: &DetectionReport) -> Self {
        Self {
            image_id: report.image_id.clone(),
            model: None,
            detections: report.all_detections.clone(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn write_json(&self, path: &Path) -> Result<(), String> {
        write_json_file(path, self)
    }

    pub fn read_json(path: &Path) -> Result<Self, String> {
        read_json_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    /// Scratch directory removed on drop, even when an assertion fails.
    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new(tag: &str) -> Self {
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos();
            Self(std::env::temp_dir().join(format!("window_detector_{tag}_{nanos}")))
        }

        fn join(&self, name: &str) -> PathBuf {
            self.0.join(name)
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            // Panicking here while already unwinding would abort the test run.
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    fn det(score: f32) -> Detection {
        Detection {
            bbox: BoundingBox::new(0, 0, 4, 4),
            score,
            label: i32::from(score > 0.0),
            scale_index: 0,
            window_index: 0,
        }
    }

    #[test]
    fn keeps_flattened_order() {
        let snap = ScoreSnapshot::from_detections("img", &[det(0.5), det(-2.0), det(1.5)]);
        assert_eq!(snap.scores, vec![0.5, -2.0, 1.5]);
        assert_eq!(snap.model, None);
    }

    #[test]
    fn json_file_matches_written_snapshot() {
        let dir = ScratchDir::new("snapshot");
        let path = dir.join("scores.json");
        let snap = ScoreSnapshot::from_detections("img", &[det(0.25), det(-1.0)]).with_model("car");
        snap.write_json(&path).unwrap();
        let back = ScoreSnapshot::read_json(&path).unwrap();
        assert_eq!(back, snap);
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"imageId\""));
    }

    #[test]
    fn scratch_dir_is_removed_on_drop() {
        let dir = ScratchDir::new("scratch");
        let root = dir.0.clone();
        ScoreSnapshot::from_detections("img", &[det(1.0)])
            .write_json(&dir.join("nested/scores.json"))
            .unwrap();
        assert!(root.exists());
        drop(dir);
        assert!(!root.exists());
    }

    #[test]
    fn listing_keeps_boxes_of_every_detection() {
        let dir = ScratchDir::new("listing");
        let path = dir.join("all.json");
        let mut far = det(-0.5);
        far.bbox = BoundingBox::new(40, 8, 80, 48);
        far.scale_index = 2;
        far.window_index = 7;
        let listing = DetectionListing {
            image_id: "img".into(),
            model: Some("car".into()),
            detections: vec![det(0.25), far],
        };
        listing.write_json(&path).unwrap();
        let back = DetectionListing::read_json(&path).unwrap();
        assert_eq!(back, listing);
        assert_eq!(back.detections[1].bbox.to_xyxy(), [40, 8, 80, 48]);
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"scaleIndex\": 2"));
    }
}
