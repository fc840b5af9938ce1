//! Core records shared by every stage of the detector.
//!
//! A single [`BoundingBox`] type with named fields is used for both
//! feature-layer and image-space coordinates. Which space a box lives in is
//! carried by the record that owns it ([`Window`] is layer space,
//! [`Detection`] and [`FinalDetection`] are image space). Conversions to and
//! from positional layouts only happen through the named helpers below.
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Axis-aligned box with inclusive `x0`/`y0` and exclusive `x1`/`y1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl BoundingBox {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Build a box from half-open vertical and horizontal intervals.
    pub fn from_ranges(y: Range<usize>, x: Range<usize>) -> Self {
        Self {
            x0: x.start as i32,
            y0: y.start as i32,
            x1: x.end as i32,
            y1: y.end as i32,
        }
    }

    /// Build a box from the image-space tuple order `(x0, y0, x1, y1)`.
    pub const fn from_xyxy(xyxy: [i32; 4]) -> Self {
        Self::new(xyxy[0], xyxy[1], xyxy[2], xyxy[3])
    }

    /// Image-space tuple order `(x0, y0, x1, y1)`.
    pub const fn to_xyxy(&self) -> [i32; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }

    /// Vertical half-open interval. Negative coordinates clamp to zero.
    pub fn y_range(&self) -> Range<usize> {
        self.y0.max(0) as usize..self.y1.max(0) as usize
    }

    /// Horizontal half-open interval. Negative coordinates clamp to zero.
    pub fn x_range(&self) -> Range<usize> {
        self.x0.max(0) as usize..self.x1.max(0) as usize
    }

    #[inline]
    pub const fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    #[inline]
    pub const fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    /// True when both extents are strictly positive.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.x1 > self.x0 && self.y1 > self.y0
    }

    /// Integer centre, rounded toward negative infinity.
    #[inline]
    pub fn center(&self) -> (i32, i32) {
        (
            (self.x0 + self.x1).div_euclid(2),
            (self.y0 + self.y1).div_euclid(2),
        )
    }

    /// Strict interior test: points on the border are outside.
    #[inline]
    pub const fn contains_strict(&self, x: i32, y: i32) -> bool {
        x > self.x0 && x < self.x1 && y > self.y0 && y < self.y1
    }
}

/// One resampling ratio of the multi-scale scan.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleLevel {
    /// Position in the planner's output order.
    pub index: usize,
    /// Ratio applied to the original image's linear dimensions.
    pub ratio: f32,
}

/// A fixed-size region of a feature layer, the unit of classification.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    /// Box in feature-layer cells.
    pub bbox: BoundingBox,
    pub scale: ScaleLevel,
}

/// Output of the classifier for one feature vector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: i32,
    /// Signed decision value; positive means object present.
    pub decision: f32,
}

/// A scored window mapped into original-image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub bbox: BoundingBox,
    pub score: f32,
    pub label: i32,
    pub scale_index: usize,
    pub window_index: usize,
}

/// An accepted object after suppression.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalDetection {
    pub bbox: BoundingBox,
    /// Score at acceptance time (always > 0).
    pub score: f32,
    pub label: i32,
    pub image_id: String,
    /// Index into the flattened detection list.
    pub source_index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_and_tuples_use_named_fields() {
        let b = BoundingBox::from_ranges(2..7, 10..20);
        assert_eq!(b.to_xyxy(), [10, 2, 20, 7]);
        assert_eq!(b.y_range(), 2..7);
        assert_eq!(b.x_range(), 10..20);
        assert_eq!(BoundingBox::from_xyxy(b.to_xyxy()), b);
    }

    #[test]
    fn center_floors_and_border_is_outside() {
        let b = BoundingBox::new(0, 0, 5, 5);
        assert_eq!(b.center(), (2, 2));
        assert!(b.contains_strict(1, 4));
        assert!(!b.contains_strict(0, 2));
        assert!(!b.contains_strict(2, 5));
    }
}
