//! Receptive-field bookkeeping between feature-layer cells and pixels.
//!
//! Mappings act on one axis at a time and on half-open intervals, so the
//! same geometry serves both the vertical and the horizontal extent of a box.
use serde::Deserialize;
use std::ops::Range;

/// Maps half-open intervals between layer units and unscaled pixels.
pub trait LayerGeometry: Send + Sync {
    /// Pixel interval covered by the layer cells `interval`.
    fn layer_to_image(&self, interval: Range<usize>) -> Range<usize>;

    /// Layer cells whose receptive fields lie inside the pixel interval.
    fn image_to_layer(&self, interval: Range<usize>) -> Range<usize>;
}

/// Geometry of a layer sampled every `stride` pixels with square receptive
/// fields of `field` pixels.
///
/// Cell `i` covers pixels `[i·stride, i·stride + field)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct CellGeometry {
    pub stride: usize,
    pub field: usize,
}

impl CellGeometry {
    pub fn new(stride: usize, field: usize) -> Self {
        Self { stride, field }
    }

    /// Number of whole cells that fit in `len` pixels.
    pub fn cells_for(&self, len: usize) -> usize {
        if self.stride == 0 || len < self.field {
            0
        } else {
            (len - self.field) / self.stride + 1
        }
    }
}

impl LayerGeometry for CellGeometry {
    fn layer_to_image(&self, interval: Range<usize>) -> Range<usize> {
        if interval.end <= interval.start {
            let p = interval.start * self.stride;
            return p..p;
        }
        interval.start * self.stride..(interval.end - 1) * self.stride + self.field
    }

    fn image_to_layer(&self, interval: Range<usize>) -> Range<usize> {
        if self.stride == 0 || interval.end < interval.start + self.field {
            let c = interval.start.div_ceil(self.stride.max(1));
            return c..c;
        }
        let start = interval.start.div_ceil(self.stride);
        let end = (interval.end - self.field) / self.stride + 1;
        start..end.max(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_intervals_cover_receptive_fields() {
        let g = CellGeometry::new(4, 8);
        assert_eq!(g.layer_to_image(0..1), 0..8);
        assert_eq!(g.layer_to_image(2..5), 8..24);
        assert_eq!(g.cells_for(24), 5);
        assert_eq!(g.cells_for(7), 0);
    }

    #[test]
    fn inverse_recovers_aligned_intervals() {
        let g = CellGeometry::new(4, 8);
        for start in 0..10 {
            for len in 1..10 {
                let layer = start..start + len;
                assert_eq!(g.image_to_layer(g.layer_to_image(layer.clone())), layer);
            }
        }
    }
}
