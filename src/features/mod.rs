//! Feature-layer tensor and the extractor/geometry seams.
//!
//! A [`FeatureMap`] has axes `(replicate, prototype, y, x)`: one or more
//! replicate bands, each holding one activation plane per prototype. The
//! detector only needs dense rectangular max-pooling over it, so storage is
//! a single contiguous row-major buffer.
//!
//! Modules
//! - [`geometry`] – interval mapping between layer cells and image pixels.
//! - [`filters`] – separable smoothing used to build replicate bands.
//! - [`grad`] – Scharr gradients.
//! - [`oriented`] – the bundled oriented-energy extractor.

pub mod filters;
pub mod geometry;
pub mod grad;
pub mod oriented;

pub use geometry::{CellGeometry, LayerGeometry};
pub use oriented::{OrientedEnergyExtractor, OrientedEnergyOptions};

use crate::error::DetectResult;
use crate::image::ImageF32;
use crate::types::BoundingBox;

/// Turns a (scaled) image into a layered activation tensor.
pub trait FeatureExtractor: Send + Sync {
    fn build_layer(&self, image: &ImageF32) -> DetectResult<FeatureMap>;

    /// Receptive-field mapping of the layers this extractor produces.
    fn geometry(&self) -> &dyn LayerGeometry;
}

/// Dense activation tensor with axes `(replicate, prototype, y, x)`.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureMap {
    pub replicates: usize,
    pub prototypes: usize,
    pub height: usize,
    pub width: usize,
    pub data: Vec<f32>,
}

impl FeatureMap {
    pub fn new(replicates: usize, prototypes: usize, height: usize, width: usize) -> Self {
        Self {
            replicates,
            prototypes,
            height,
            width,
            data: vec![0.0; replicates * prototypes * height * width],
        }
    }

    #[inline]
    pub fn idx(&self, r: usize, p: usize, y: usize, x: usize) -> usize {
        ((r * self.prototypes + p) * self.height + y) * self.width + x
    }

    #[inline]
    pub fn get(&self, r: usize, p: usize, y: usize, x: usize) -> f32 {
        self.data[self.idx(r, p, y, x)]
    }

    #[inline]
    pub fn set(&mut self, r: usize, p: usize, y: usize, x: usize, v: f32) {
        let i = self.idx(r, p, y, x);
        self.data[i] = v;
    }

    /// One `height × width` activation plane.
    pub fn plane(&self, r: usize, p: usize) -> &[f32] {
        let start = self.idx(r, p, 0, 0);
        &self.data[start..start + self.height * self.width]
    }

    /// Per-prototype maximum over all replicates and all cells of `bbox`.
    ///
    /// Returns `None` when the box is empty or reaches outside the map.
    pub fn window_max(&self, bbox: &BoundingBox) -> Option<Vec<f32>> {
        if !bbox.is_valid() || bbox.x0 < 0 || bbox.y0 < 0 {
            return None;
        }
        let (ys, xs) = (bbox.y_range(), bbox.x_range());
        if ys.end > self.height || xs.end > self.width {
            return None;
        }
        let mut pooled = vec![f32::NEG_INFINITY; self.prototypes];
        for r in 0..self.replicates {
            for (p, best) in pooled.iter_mut().enumerate() {
                let plane = self.plane(r, p);
                for y in ys.clone() {
                    let row = &plane[y * self.width + xs.start..y * self.width + xs.end];
                    for &v in row {
                        if v > *best {
                            *best = v;
                        }
                    }
                }
            }
        }
        Some(pooled)
    }
}
