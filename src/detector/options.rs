//! Parameter types configuring the detector stages.
//!
//! Defaults reproduce the reference scan: 30 scale levels over a 1000 px
//! width ramp, 9×9-cell windows at stride 1, at most 20 objects, a 35% mask
//! expansion and σ = 1.2. Images narrower than the ramp need a smaller
//! `scales.span_px`.

use crate::error::{DetectError, DetectResult};
use crate::scales::ScaleOptions;
use crate::suppress::SuppressionOptions;
use crate::windows::WindowOptions;
use serde::Deserialize;

/// Detector-wide parameters controlling the multi-stage pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// Window tiling of each feature layer.
    pub windows: WindowOptions,
    /// Scale ramp applied to the input image.
    pub scales: ScaleOptions,
    /// Greedy suppression of overlapping detections.
    pub suppression: SuppressionOptions,
}

impl DetectorParams {
    /// Reject parameters that cannot produce a meaningful scan.
    pub fn validate(&self) -> DetectResult<()> {
        self.windows.validate()?;
        self.suppression.validate()?;
        if self.scales.num_scales == 0 {
            return Err(DetectError::InvalidConfiguration(
                "num_scales must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let params: DetectorParams =
            serde_json::from_str(r#"{ "windows": { "step_size": 2 }, "suppression": { "detection_cap": 5 } }"#)
                .unwrap();
        assert_eq!(params.windows.step_size, 2);
        assert_eq!(params.windows.box_size, 9);
        assert_eq!(params.scales.num_scales, 30);
        assert_eq!(params.suppression.detection_cap, 5);
        assert_eq!(params.suppression.sigma, 1.2);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn zero_step_fails_validation() {
        let mut params = DetectorParams::default();
        params.windows.step_size = 0;
        assert!(params.validate().is_err());
    }
}
