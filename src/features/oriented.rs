//! Oriented gradient-energy layer.
//!
//! Design
//! - Each replicate band is the input smoothed `band` times with the 5-tap
//!   Gaussian, so coarser structure shows up in later bands.
//! - Per band, Scharr gradients are split into `orientations` unsigned bins.
//!   Prototype `p` of a cell is the strongest gradient magnitude of bin `p`
//!   within the cell's `pool_size × pool_size` receptive field.
//! - Cells are laid out every `cell_size` pixels, which is exactly the
//!   [`CellGeometry`] reported to the coordinate mapper.
use super::filters::{blur_separable, GAUSSIAN_5TAP};
use super::geometry::{CellGeometry, LayerGeometry};
use super::grad::scharr_gradients;
use super::{FeatureExtractor, FeatureMap};
use crate::error::{DetectError, DetectResult};
use crate::image::{ImageF32, ImageView};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrientedEnergyOptions {
    /// Pixel distance between neighbouring cells.
    pub cell_size: usize,
    /// Receptive field side of one cell in pixels.
    pub pool_size: usize,
    /// Number of unsigned orientation bins over `[0, π)`.
    pub orientations: usize,
    /// Number of replicate bands (progressively smoothed copies).
    pub bands: usize,
}

impl OrientedEnergyOptions {
    /// Length of a pooled window vector: one value per orientation bin.
    pub fn feature_len(&self) -> usize {
        self.orientations
    }
}

impl Default for OrientedEnergyOptions {
    fn default() -> Self {
        Self {
            cell_size: 4,
            pool_size: 8,
            orientations: 8,
            bands: 2,
        }
    }
}

#[derive(Clone, Debug)]
pub struct OrientedEnergyExtractor {
    options: OrientedEnergyOptions,
    geometry: CellGeometry,
}

impl OrientedEnergyExtractor {
    pub fn new(options: OrientedEnergyOptions) -> DetectResult<Self> {
        let OrientedEnergyOptions {
            cell_size,
            pool_size,
            orientations,
            bands,
        } = options;
        if cell_size == 0 || pool_size == 0 || orientations == 0 || bands == 0 {
            return Err(DetectError::InvalidConfiguration(format!(
                "oriented energy options must be positive: {options:?}"
            )));
        }
        Ok(Self {
            options,
            geometry: CellGeometry::new(cell_size, pool_size),
        })
    }

    pub fn options(&self) -> &OrientedEnergyOptions {
        &self.options
    }
}

impl FeatureExtractor for OrientedEnergyExtractor {
    fn build_layer(&self, image: &ImageF32) -> DetectResult<FeatureMap> {
        if image.data.len() != image.w * image.h {
            return Err(DetectError::FeatureExtraction(format!(
                "image buffer of {} samples does not match {}x{}",
                image.data.len(),
                image.w,
                image.h
            )));
        }
        let OrientedEnergyOptions {
            cell_size,
            pool_size,
            orientations,
            bands,
        } = self.options;
        let lh = self.geometry.cells_for(image.h);
        let lw = self.geometry.cells_for(image.w);
        let mut map = FeatureMap::new(bands, orientations, lh, lw);
        if lh == 0 || lw == 0 {
            return Ok(map);
        }

        let mut band_image = image.clone();
        for band in 0..bands {
            if band > 0 {
                band_image = blur_separable(&band_image, &GAUSSIAN_5TAP);
            }
            let grad = scharr_gradients(&band_image);
            let mut best = vec![0.0f32; orientations];
            for cy in 0..lh {
                for cx in 0..lw {
                    best.fill(0.0);
                    let (y0, x0) = (cy * cell_size, cx * cell_size);
                    for y in y0..y0 + pool_size {
                        let mag_row = grad.mag.row(y);
                        for x in x0..x0 + pool_size {
                            let m = mag_row[x];
                            let bin = grad.bin(x, y, orientations);
                            if m > best[bin] {
                                best[bin] = m;
                            }
                        }
                    }
                    for (p, &v) in best.iter().enumerate() {
                        map.set(band, p, cy, cx, v);
                    }
                }
            }
        }
        Ok(map)
    }

    fn geometry(&self) -> &dyn LayerGeometry {
        &self.geometry
    }
}
