//! Separable smoothing filters.
//!
//! Replicate bands of the oriented-energy layer are produced by repeatedly
//! smoothing the input with a normalised separable kernel. Borders replicate
//! the edge pixel.
use crate::image::{ImageF32, ImageView, ImageViewMut};

/// Trait implemented by separable 1D filters.
pub trait SeparableFilter {
    /// Return the 1D taps (in left-to-right order). The kernel is assumed to be
    /// symmetric around its centre, but the implementation does not rely on it.
    fn taps(&self) -> &[f32];
}

/// Simple wrapper around a static filter kernel.
#[derive(Clone, Copy, Debug)]
pub struct StaticSeparableFilter {
    taps: &'static [f32],
}

impl Default for StaticSeparableFilter {
    fn default() -> Self {
        GAUSSIAN_5TAP
    }
}

impl StaticSeparableFilter {
    pub const fn new(taps: &'static [f32]) -> Self {
        Self { taps }
    }
}

impl SeparableFilter for StaticSeparableFilter {
    #[inline]
    fn taps(&self) -> &[f32] {
        self.taps
    }
}

/// Normalised 5-tap Gaussian filter `[1, 4, 6, 4, 1] / 16`.
pub const GAUSSIAN_5TAP: StaticSeparableFilter =
    StaticSeparableFilter::new(&[0.0625, 0.25, 0.375, 0.25, 0.0625]);

/// Convolve `src` with `filter` along both axes, keeping the resolution.
pub fn blur_separable(src: &ImageF32, filter: &dyn SeparableFilter) -> ImageF32 {
    let taps = filter.taps();
    if src.is_empty() || taps.is_empty() {
        return src.clone();
    }
    let radius = (taps.len() / 2) as isize;
    let (w, h) = (src.w, src.h);

    let mut tmp = ImageF32::new(w, h);
    for y in 0..h {
        let src_row = src.row(y);
        let dst_row = tmp.row_mut(y);
        for (x, dst_px) in dst_row.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &tap) in taps.iter().enumerate() {
                let sx = clamp_index(x as isize + k as isize - radius, w);
                acc += tap * src_row[sx];
            }
            *dst_px = acc;
        }
    }

    let mut out = ImageF32::new(w, h);
    for y in 0..h {
        let dst_row = out.row_mut(y);
        for (k, &tap) in taps.iter().enumerate() {
            let sy = clamp_index(y as isize + k as isize - radius, h);
            let src_row = tmp.row(sy);
            for (dst_px, &s) in dst_row.iter_mut().zip(src_row) {
                *dst_px += tap * s;
            }
        }
    }
    out
}

fn clamp_index(idx: isize, upper: usize) -> usize {
    if upper == 0 {
        return 0;
    }
    if idx < 0 {
        0
    } else if (idx as usize) >= upper {
        upper - 1
    } else {
        idx as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blur_preserves_constant_images_and_spreads_impulses() {
        let mut flat = ImageF32::new(7, 5);
        flat.data.fill(0.5);
        let out = blur_separable(&flat, &GAUSSIAN_5TAP);
        assert!(out.data.iter().all(|v| (v - 0.5).abs() < 1e-6));

        let mut dot = ImageF32::new(9, 9);
        dot.set(4, 4, 1.0);
        let out = blur_separable(&dot, &GAUSSIAN_5TAP);
        assert!((out.get(4, 4) - 0.375 * 0.375).abs() < 1e-6);
        assert!(out.get(3, 4) > 0.0 && out.get(3, 4) < out.get(4, 4));
        let total: f32 = out.data.iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
    }
}
