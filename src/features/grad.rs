//! Scharr image gradients with magnitude and unsigned orientation.
//!
//! - Convolves the 3×3 Scharr pair with border clamping.
//! - Outputs per-pixel `mag = sqrt(gx^2 + gy^2)` and the edge orientation
//!   folded modulo π into `[0, π)`, so dark→bright and bright→dark edges of
//!   the same direction land in the same bin.
use crate::image::{ImageF32, ImageView, ImageViewMut};
use std::f32::consts::PI;

type Kernel3 = [[f32; 3]; 3];

const SCHARR_KERNEL_X: Kernel3 = [[-3.0, 0.0, 3.0], [-10.0, 0.0, 10.0], [-3.0, 0.0, 3.0]];
const SCHARR_KERNEL_Y: Kernel3 = [[-3.0, -10.0, -3.0], [0.0, 0.0, 0.0], [3.0, 10.0, 3.0]];

/// Scharr responses are normalised by the kernel's absolute weight sum.
const SCHARR_NORM: f32 = 1.0 / 32.0;

#[derive(Clone, Debug)]
pub struct Grad {
    /// Euclidean magnitude per pixel
    pub mag: ImageF32,
    /// Unsigned orientation in `[0, π)`
    pub theta: ImageF32,
}

impl Grad {
    /// Orientation bin of pixel (x, y) for `bins` uniform bins over `[0, π)`.
    #[inline]
    pub fn bin(&self, x: usize, y: usize, bins: usize) -> usize {
        orientation_bin(self.theta.get(x, y), bins)
    }
}

#[inline]
pub fn orientation_bin(theta: f32, bins: usize) -> usize {
    let b = (theta * (bins as f32 / PI)).floor() as usize;
    b.min(bins.saturating_sub(1))
}

pub fn scharr_gradients(l: &ImageF32) -> Grad {
    let w = l.w;
    let h = l.h;
    let mut mag = ImageF32::new(w, h);
    let mut theta = ImageF32::new(w, h);
    if w == 0 || h == 0 {
        return Grad { mag, theta };
    }

    for y in 0..h {
        let y_idx = [y.saturating_sub(1), y, (y + 1).min(h - 1)];
        let rows = [l.row(y_idx[0]), l.row(y_idx[1]), l.row(y_idx[2])];
        let out_mag = mag.row_mut(y);
        let out_theta = theta.row_mut(y);
        for x in 0..w {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];

            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            for (ky, yy_row) in rows.iter().enumerate() {
                let kx_row = &SCHARR_KERNEL_X[ky];
                let ky_row = &SCHARR_KERNEL_Y[ky];
                sum_x += yy_row[x_idx[0]] * kx_row[0]
                    + yy_row[x_idx[1]] * kx_row[1]
                    + yy_row[x_idx[2]] * kx_row[2];
                sum_y += yy_row[x_idx[0]] * ky_row[0]
                    + yy_row[x_idx[1]] * ky_row[1]
                    + yy_row[x_idx[2]] * ky_row[2];
            }
            sum_x *= SCHARR_NORM;
            sum_y *= SCHARR_NORM;

            out_mag[x] = (sum_x * sum_x + sum_y * sum_y).sqrt();
            out_theta[x] = sum_y.atan2(sum_x).rem_euclid(PI);
        }
    }

    Grad { mag, theta }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_step_has_horizontal_gradient() {
        let mut img = ImageF32::new(8, 8);
        for y in 0..8 {
            for x in 4..8 {
                img.set(x, y, 1.0);
            }
        }
        let g = scharr_gradients(&img);
        assert!(g.mag.get(4, 4) > 0.4);
        assert_eq!(g.mag.get(1, 4), 0.0);
        assert_eq!(g.bin(4, 4, 4), 0);
    }

    #[test]
    fn bins_fold_modulo_pi() {
        assert_eq!(orientation_bin(0.0, 8), 0);
        assert_eq!(orientation_bin(PI - 1e-4, 8), 7);
        assert_eq!(orientation_bin(PI / 2.0, 4), 2);
    }
}
