//! Layer-space ↔ image-space box conversion.
//!
//! A layer box is mapped one axis at a time through the extractor's
//! [`LayerGeometry`] into pixels of the *scaled* image, then divided by the
//! scale ratio and truncated to land in original-image pixels.
use crate::error::{DetectError, DetectResult};
use crate::features::LayerGeometry;
use crate::types::BoundingBox;
use std::ops::Range;

pub struct CoordinateMapper<'a> {
    geometry: &'a dyn LayerGeometry,
}

impl<'a> CoordinateMapper<'a> {
    pub fn new(geometry: &'a dyn LayerGeometry) -> Self {
        Self { geometry }
    }

    /// Map a feature-layer box produced at `scale` into original-image pixels.
    pub fn map_to_image(&self, layer: &BoundingBox, scale: f32) -> DetectResult<BoundingBox> {
        check_scale(scale)?;
        check_box(layer, "layer")?;
        let y = self.geometry.layer_to_image(layer.y_range());
        let x = self.geometry.layer_to_image(layer.x_range());
        let mapped = BoundingBox::new(
            unscale(x.start, scale),
            unscale(y.start, scale),
            unscale(x.end, scale),
            unscale(y.end, scale),
        );
        check_box(&mapped, "mapped image")?;
        Ok(mapped)
    }

    /// Inverse of [`map_to_image`](Self::map_to_image) up to truncation.
    pub fn map_to_layer(&self, image: &BoundingBox, scale: f32) -> DetectResult<BoundingBox> {
        check_scale(scale)?;
        check_box(image, "image")?;
        let y = self.geometry.image_to_layer(rescale(image.y_range(), scale));
        let x = self.geometry.image_to_layer(rescale(image.x_range(), scale));
        let mapped = BoundingBox::from_ranges(y, x);
        check_box(&mapped, "mapped layer")?;
        Ok(mapped)
    }
}

fn check_scale(scale: f32) -> DetectResult<()> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(DetectError::CoordinateMapping(format!(
            "scale must be positive and finite, got {scale}"
        )))
    }
}

fn check_box(b: &BoundingBox, what: &str) -> DetectResult<()> {
    if b.is_valid() && b.x0 >= 0 && b.y0 >= 0 {
        Ok(())
    } else {
        Err(DetectError::CoordinateMapping(format!(
            "{what} box {:?} is empty or inverted",
            b.to_xyxy()
        )))
    }
}

#[inline]
fn unscale(v: usize, scale: f32) -> i32 {
    (v as f64 / scale as f64) as i32
}

fn rescale(r: Range<usize>, scale: f32) -> Range<usize> {
    let s = scale as f64;
    (r.start as f64 * s).round() as usize..(r.end as f64 * s).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::CellGeometry;

    #[test]
    fn maps_axes_independently_and_divides_by_scale() {
        let g = CellGeometry::new(4, 8);
        let m = CoordinateMapper::new(&g);
        // y cells 1..3 -> px 4..16, x cells 2..5 -> px 8..24
        let layer = BoundingBox::from_ranges(1..3, 2..5);
        let img = m.map_to_image(&layer, 0.5).unwrap();
        assert_eq!(img.to_xyxy(), [16, 8, 48, 32]);
        let img = m.map_to_image(&layer, 1.0).unwrap();
        assert_eq!(img.to_xyxy(), [8, 4, 24, 16]);
    }

    #[test]
    fn truncates_toward_zero() {
        let g = CellGeometry::new(1, 1);
        let m = CoordinateMapper::new(&g);
        let img = m
            .map_to_image(&BoundingBox::from_ranges(1..3, 1..3), 0.7)
            .unwrap();
        // 1 / 0.7 = 1.43, 3 / 0.7 = 4.29
        assert_eq!(img.to_xyxy(), [1, 1, 4, 4]);
    }

    #[test]
    fn zero_scale_is_rejected_before_mapping() {
        let g = CellGeometry::new(4, 8);
        let m = CoordinateMapper::new(&g);
        let layer = BoundingBox::from_ranges(0..2, 0..2);
        assert!(matches!(
            m.map_to_image(&layer, 0.0),
            Err(DetectError::CoordinateMapping(_))
        ));
        assert!(m.map_to_image(&layer, -1.0).is_err());
    }

    #[test]
    fn empty_layer_box_is_rejected() {
        let g = CellGeometry::new(4, 8);
        let m = CoordinateMapper::new(&g);
        let inverted = BoundingBox::new(3, 0, 2, 2);
        assert!(matches!(
            m.map_to_image(&inverted, 1.0),
            Err(DetectError::CoordinateMapping(_))
        ));
    }

    #[test]
    fn round_trip_is_within_one_cell() {
        let g = CellGeometry::new(4, 8);
        let m = CoordinateMapper::new(&g);
        for scale in [1.0f32, 0.9, 0.73, 0.5, 0.31] {
            for y0 in 0..6 {
                for x0 in 0..6 {
                    let layer = BoundingBox::from_ranges(y0..y0 + 9, x0..x0 + 9);
                    let img = m.map_to_image(&layer, scale).unwrap();
                    let back = m.map_to_layer(&img, scale).unwrap();
                    for (a, b) in layer.to_xyxy().iter().zip(back.to_xyxy()) {
                        assert!((a - b).abs() <= 1, "{layer:?} -> {back:?} at {scale}");
                    }
                }
            }
        }
    }
}
