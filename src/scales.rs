//! Scale planning for the multi-scale scan.
//!
//! The default policy requests a ramp of target widths at fixed pixel
//! offsets from the input width, so ratios shrink roughly linearly in pixels
//! rather than geometrically. The planner is a trait so that detectors can
//! swap in another policy without touching the pipeline.
use crate::error::{DetectError, DetectResult};
use crate::image::resize::scaled_dimensions;
use crate::types::ScaleLevel;
use serde::Deserialize;

pub trait ScalePlanner: Send + Sync {
    /// Ordered scale levels for an image of `width × height` pixels.
    fn plan(&self, width: usize, height: usize) -> DetectResult<Vec<ScaleLevel>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScaleOptions {
    /// Number of scale levels.
    pub num_scales: usize,
    /// Total pixel width removed across the ramp.
    pub span_px: f32,
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self {
            num_scales: 30,
            span_px: 1000.0,
        }
    }
}

/// Width ramp: level `i` targets `W - i·floor(span / N)` pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WidthRampPlanner {
    pub options: ScaleOptions,
}

impl WidthRampPlanner {
    pub fn new(options: ScaleOptions) -> Self {
        Self { options }
    }

    /// Pixel offset between consecutive target widths.
    pub fn step_px(&self) -> usize {
        let n = self.options.num_scales.max(1) as f32;
        (self.options.span_px / n).floor().max(0.0) as usize
    }
}

impl ScalePlanner for WidthRampPlanner {
    fn plan(&self, width: usize, height: usize) -> DetectResult<Vec<ScaleLevel>> {
        let n = self.options.num_scales;
        if n == 0 {
            return Err(DetectError::InvalidConfiguration(
                "num_scales must be at least 1".into(),
            ));
        }
        if !self.options.span_px.is_finite() || self.options.span_px < 0.0 {
            return Err(DetectError::InvalidConfiguration(format!(
                "span_px must be finite and non-negative, got {}",
                self.options.span_px
            )));
        }
        if width == 0 || height == 0 {
            return Err(DetectError::InvalidConfiguration(format!(
                "cannot plan scales for a {width}x{height} image"
            )));
        }

        let step = self.step_px();
        let mut levels = Vec::with_capacity(n);
        for index in 0..n {
            let offset = index * step;
            if offset >= width {
                return Err(DetectError::InvalidConfiguration(format!(
                    "scale {index} targets width {} for a {width}px wide image",
                    width as i64 - offset as i64
                )));
            }
            let ratio = ((width - offset) as f64 / width as f64) as f32;
            scaled_dimensions(width, height, ratio)?;
            levels.push(ScaleLevel { index, ratio });
        }
        Ok(levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_plan_is_a_decreasing_width_ramp() {
        let planner = WidthRampPlanner::default();
        let levels = planner.plan(2000, 1500).unwrap();
        assert_eq!(levels.len(), 30);
        assert_eq!(planner.step_px(), 33);
        assert_relative_eq!(levels[0].ratio, 1.0);
        assert_relative_eq!(levels[1].ratio, 1967.0 / 2000.0);
        assert_relative_eq!(levels[29].ratio, (2000.0 - 29.0 * 33.0) / 2000.0);
        assert!(levels.windows(2).all(|w| w[1].ratio < w[0].ratio));
        assert!(levels.iter().enumerate().all(|(i, l)| l.index == i));
    }

    #[test]
    fn narrow_image_is_rejected() {
        let planner = WidthRampPlanner::default();
        assert!(matches!(
            planner.plan(640, 480),
            Err(DetectError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn ratio_collapsing_height_is_rejected() {
        let planner = WidthRampPlanner::new(ScaleOptions {
            num_scales: 2,
            span_px: 1800.0,
        });
        // Second level keeps 100 of 1000 px, height 5 -> 0 rows.
        assert!(planner.plan(1000, 5).is_err());
        assert!(planner.plan(1000, 50).is_ok());
    }

    #[test]
    fn zero_scales_is_rejected() {
        let planner = WidthRampPlanner::new(ScaleOptions {
            num_scales: 0,
            span_px: 1000.0,
        });
        assert!(planner.plan(100, 100).is_err());
    }
}
