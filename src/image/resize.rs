//! Resampling of the working image to each scale level.
//!
//! Target dimensions follow the scan convention `floor(w * ratio)` ×
//! `floor(h * ratio)`. A ratio that collapses either side to zero is a
//! configuration error rather than an empty level.
use super::traits::{ImageView, ImageViewMut};
use super::ImageF32;
use crate::error::{DetectError, DetectResult};
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma};
use serde::Deserialize;

/// Quality-preserving resampler applied before feature extraction.
pub trait ImageScaler: Send + Sync {
    fn resize(&self, image: &ImageF32, ratio: f32) -> DetectResult<ImageF32>;
}

/// Compute the resized dimensions for `ratio`, rejecting degenerate sizes.
pub fn scaled_dimensions(w: usize, h: usize, ratio: f32) -> DetectResult<(usize, usize)> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(DetectError::InvalidConfiguration(format!(
            "scale ratio must be positive and finite, got {ratio}"
        )));
    }
    let nw = (w as f64 * ratio as f64) as usize;
    let nh = (h as f64 * ratio as f64) as usize;
    if nw == 0 || nh == 0 {
        return Err(DetectError::InvalidConfiguration(format!(
            "scale ratio {ratio} resolves {w}x{h} to {nw}x{nh}"
        )));
    }
    Ok((nw, nh))
}

/// Resampling kernel used by [`AntialiasScaler`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Separable-kernel resampler backed by `image::imageops::resize`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AntialiasScaler {
    pub filter: ResizeFilter,
}

impl AntialiasScaler {
    pub fn new(filter: ResizeFilter) -> Self {
        Self { filter }
    }
}

impl ImageScaler for AntialiasScaler {
    fn resize(&self, image: &ImageF32, ratio: f32) -> DetectResult<ImageF32> {
        let (nw, nh) = scaled_dimensions(image.w, image.h, ratio)?;
        if nw == image.w && nh == image.h {
            return Ok(image.clone());
        }
        let samples = image
            .as_slice()
            .filter(|s| s.len() == image.w * image.h)
            .ok_or_else(|| {
                DetectError::InvalidConfiguration(format!(
                    "image buffer of {} samples does not match {}x{}",
                    image.data.len(),
                    image.w,
                    image.h
                ))
            })?;
        let src: ImageBuffer<Luma<f32>, Vec<f32>> =
            ImageBuffer::from_raw(image.w as u32, image.h as u32, samples.to_vec()).ok_or_else(
                || DetectError::InvalidConfiguration(format!("cannot wrap {}x{} buffer", image.w, image.h)),
            )?;
        let resized = imageops::resize(&src, nw as u32, nh as u32, self.filter.into());
        let mut out = ImageF32::from_vec(nw, nh, resized.into_raw()).ok_or_else(|| {
            DetectError::InvalidConfiguration(format!("resampler returned wrong size for {nw}x{nh}"))
        })?;
        // Lanczos ringing can leave the [0, 1] range.
        if let Some(px) = out.as_mut_slice() {
            px.iter_mut().for_each(|v| *v = v.clamp(0.0, 1.0));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_truncate_like_the_scan() {
        assert_eq!(scaled_dimensions(640, 480, 0.5).unwrap(), (320, 240));
        assert_eq!(scaled_dimensions(101, 51, 0.5).unwrap(), (50, 25));
    }

    #[test]
    fn degenerate_ratio_is_rejected() {
        assert!(matches!(
            scaled_dimensions(10, 10, 0.05),
            Err(DetectError::InvalidConfiguration(_))
        ));
        assert!(scaled_dimensions(10, 10, 0.0).is_err());
        assert!(scaled_dimensions(10, 10, f32::NAN).is_err());
    }

    #[test]
    fn constant_image_stays_constant() {
        let mut img = ImageF32::new(40, 30);
        img.data.fill(0.25);
        let out = AntialiasScaler::default().resize(&img, 0.5).unwrap();
        assert_eq!((out.w, out.h), (20, 15));
        assert!(out.data.iter().all(|v| (v - 0.25).abs() < 1e-3));
    }
}
