//! Variance and average extraction
//!
//! For each texel of a region, two box queries are issued against the
//! summed-area tables built for that region:
//!
//! - the avg/var window (`avg_var_radius`, all four channels) yields the
//!   mean and the bias-corrected sample variance
//!   `var = n/(n(n-1)) * sum(x^2) - 1/(n(n-1)) * sum(x)^2`;
//! - the alpha window (`alpha_radius`) yields a separate alpha-only mean.
//!
//! The sample count `n` is always the full kernel volume `(2r+1)^d`: edge
//! texels are repeated by the clamped halo, never dropped. For `n == 1` the
//! variance factor degenerates to `sum(x^2) - sum(x)^2`, which is zero for
//! a single sample.

use crate::output::TaskOutput;
use crate::sat::{SatWindow, SummedAreaTable};
use crate::tile::{Region, TileGeometry};

/// Per-invocation normalization constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelConstants {
    avg_var_radius: usize,
    alpha_radius: usize,
    avg_var_rsamples: f32,
    alpha_rsamples: f32,
    mul1: f32,
    mul2: f32,
}

impl KernelConstants {
    pub fn new(avg_var_radius: u32, alpha_radius: u32, has_z: bool) -> Self {
        let dims = if has_z { 3 } else { 2 };
        let volume = |r: u32| ((2 * r as u64 + 1) as f64).powi(dims);

        let avg_var_samples = volume(avg_var_radius);
        let mul1 = if avg_var_samples == 1.0 {
            1.0
        } else {
            1.0 / (avg_var_samples * (avg_var_samples - 1.0))
        };

        Self {
            avg_var_radius: avg_var_radius as usize,
            alpha_radius: alpha_radius as usize,
            avg_var_rsamples: (1.0 / avg_var_samples) as f32,
            alpha_rsamples: (1.0 / volume(alpha_radius)) as f32,
            mul1: mul1 as f32,
            mul2: (avg_var_samples * mul1) as f32,
        }
    }

    /// Reciprocal of the avg/var window sample count
    pub fn avg_var_rsamples(&self) -> f32 {
        self.avg_var_rsamples
    }

    /// Reciprocal of the alpha window sample count
    pub fn alpha_rsamples(&self) -> f32 {
        self.alpha_rsamples
    }

    /// `(mul1, mul2)` of the variance identity
    pub fn variance_factors(&self) -> (f32, f32) {
        (self.mul1, self.mul2)
    }
}

/// Write statistics for every texel of `region` into `out`.
///
/// `sat` must have been built for `region` with the same `geometry`, and
/// `region` must lie inside `out`'s task region.
pub fn extract_region(
    sat: &SummedAreaTable<'_>,
    geometry: &TileGeometry,
    k: &KernelConstants,
    region: &Region,
    out: &mut TaskOutput<'_>,
) {
    let r = geometry.kernel_radius() as usize;
    let has_z = geometry.has_z();
    let (av_rz, al_rz) = if has_z {
        (k.avg_var_radius, k.alpha_radius)
    } else {
        (0, 0)
    };

    for z in 0..region.depth {
        let cz = if has_z { z as usize + r } else { 0 };
        let band = out.band_mut(region.z + z);

        for y in 0..region.height {
            let cy = y as usize + r;
            for x in 0..region.width {
                let center = [x as usize + r, cy, cz];

                let alpha_win = SatWindow::around(center, k.alpha_radius, al_rz);
                let alpha_sum = sat.box_sum(&alpha_win).a;

                let win = SatWindow::around(center, k.avg_var_radius, av_rz);
                let v1 = sat.box_sum(&win);
                let v2 = sat.box_sum_squares(&win);

                let average = v1 * k.avg_var_rsamples;
                let variance = k.mul2 * v2 - k.mul1 * (v1 * v1);

                band.write(
                    region.x + x,
                    region.y + y,
                    average,
                    variance,
                    alpha_sum * k.alpha_rsamples,
                );
            }
        }
    }
}
