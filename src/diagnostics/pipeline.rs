use crate::diagnostics::{ScaleLevelReport, TimingBreakdown};
use crate::suppress::SuppressionOutcome;
use crate::types::{Detection, FinalDetection};
use serde::Serialize;

/// Result produced by [`WindowDetector::process`](crate::WindowDetector::process).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub image_id: String,
    /// Accepted objects in acceptance order.
    pub detections: Vec<FinalDetection>,
    /// Every scored window in original-image coordinates, original scores.
    #[serde(skip_serializing)]
    pub all_detections: Vec<Detection>,
    pub trace: PipelineTrace,
}

impl DetectionReport {
    /// Multi-line summary used by the CLI at `info` level.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{}: {}x{} px, {} scales, {} windows, {} accepted ({:?})",
            self.image_id,
            self.trace.input.width,
            self.trace.input.height,
            self.trace.input.num_scales,
            self.trace.flattened,
            self.detections.len(),
            self.trace.suppression.stop
        );
        for d in &self.detections {
            out.push_str(&format!(
                "\n  #{:<5} {:?} label={} score={:.3}",
                d.source_index,
                d.bbox.to_xyxy(),
                d.label,
                d.score
            ));
        }
        out
    }
}

/// End-to-end trace describing the internal execution of the detector.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    pub scales: Vec<ScaleLevelReport>,
    /// Length of the flattened detection list.
    pub flattened: usize,
    pub suppression: SuppressionOutcome,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub num_scales: usize,
}
