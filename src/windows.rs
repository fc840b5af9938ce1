//! Sliding-window tiling of a feature-layer extent.
//!
//! Positions start at the origin and advance by `step` while strictly below
//! `extent - size`. Boxes never reach past the plane and are never clipped;
//! when the last full position does not fall on the stride grid it is simply
//! skipped. Output is row-major (vertical outer, horizontal inner).
use crate::error::{DetectError, DetectResult};
use crate::types::BoundingBox;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WindowOptions {
    /// Distance in layer cells between neighbouring window corners.
    pub step_size: usize,
    /// Side of every window in layer cells.
    pub box_size: usize,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            step_size: 1,
            box_size: 9,
        }
    }
}

impl WindowOptions {
    pub fn validate(&self) -> DetectResult<()> {
        if self.step_size == 0 || self.box_size == 0 {
            return Err(DetectError::InvalidConfiguration(format!(
                "step_size and box_size must be positive (got {} and {})",
                self.step_size, self.box_size
            )));
        }
        Ok(())
    }
}

/// Tile a `height × width` plane with `size × size` boxes every `step` cells.
pub fn make_windows(
    height: usize,
    width: usize,
    step: usize,
    size: usize,
) -> DetectResult<Vec<BoundingBox>> {
    WindowOptions {
        step_size: step,
        box_size: size,
    }
    .validate()?;

    let rows = height.saturating_sub(size);
    let cols = width.saturating_sub(size);
    let mut windows = Vec::with_capacity(rows.div_ceil(step) * cols.div_ceil(step));
    for y0 in (0..rows).step_by(step) {
        for x0 in (0..cols).step_by(step) {
            windows.push(BoundingBox::from_ranges(y0..y0 + size, x0..x0 + size));
        }
    }
    Ok(windows)
}
