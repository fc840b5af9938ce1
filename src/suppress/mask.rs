//! Gaussian decay mask used to attenuate neighbours of an accepted box.
//!
//! Cell `(dx, dy)` (offset from the centre) holds
//! `1 - exp(-(dx² + dy²) / (2 (σ r)²))`: the 2-D Gaussian density with
//! spatial scale `σ·r`, multiplied by its normalising constant `2π(σr)²` and
//! subtracted from one. The centre is 0 (full suppression) and values rise
//! toward 1 away from it.
use crate::types::BoundingBox;
use nalgebra::DMatrix;

#[derive(Clone, Debug, PartialEq)]
pub struct SuppressionMask {
    radius: usize,
    /// Row index is the vertical offset, column index the horizontal one.
    weights: DMatrix<f32>,
}

impl SuppressionMask {
    /// Mask radius for a box of horizontal extent `len` grown by `expansion`.
    ///
    /// The growth is truncated to whole pixels before halving.
    pub fn radius_for_length(len: i32, expansion: f32) -> usize {
        let len = len.max(0) as f64;
        let grown = len + (len * expansion.max(0.0) as f64).floor();
        (grown / 2.0).floor() as usize
    }

    pub fn new(radius: usize, sigma: f32) -> Self {
        let side = 2 * radius + 1;
        if radius == 0 {
            return Self {
                radius,
                weights: DMatrix::zeros(1, 1),
            };
        }
        let spread = sigma as f64 * radius as f64;
        let denom = 2.0 * spread * spread;
        let r = radius as f64;
        let weights = DMatrix::from_fn(side, side, |row, col| {
            let dy = row as f64 - r;
            let dx = col as f64 - r;
            (1.0 - (-(dx * dx + dy * dy) / denom).exp()) as f32
        });
        Self { radius, weights }
    }

    /// Mask sized from the horizontal extent of `bbox`.
    pub fn for_box(bbox: &BoundingBox, expansion: f32, sigma: f32) -> Self {
        Self::new(Self::radius_for_length(bbox.width(), expansion), sigma)
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn side(&self) -> usize {
        2 * self.radius + 1
    }

    /// Weight at mask indices `(ix, iy)`, `None` outside the mask.
    pub fn at(&self, ix: i64, iy: i64) -> Option<f32> {
        let side = self.side() as i64;
        if (0..side).contains(&ix) && (0..side).contains(&iy) {
            Some(self.weights[(iy as usize, ix as usize)])
        } else {
            None
        }
    }

    pub fn weights(&self) -> &DMatrix<f32> {
        &self.weights
    }
}
