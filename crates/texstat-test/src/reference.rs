//! Brute-force reference statistics
//!
//! Direct summation over every window in `f64`, with out-of-range
//! coordinates clamped to the nearest edge texel. Slow, but independent of
//! the summed-area-table path it is used to check.

use texstat_core::{Dimensions, Float4};

/// Windowed statistics of one texel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceStats {
    pub average: [f64; 4],
    pub variance: [f64; 4],
    pub alpha_average: f64,
}

impl ReferenceStats {
    /// Average rounded to `f32` channels
    pub fn average_float4(&self) -> Float4 {
        Float4::from_array(self.average.map(|c| c as f32))
    }

    /// Variance rounded to `f32` channels
    pub fn variance_float4(&self) -> Float4 {
        Float4::from_array(self.variance.map(|c| c as f32))
    }
}

fn clamp_axis(center: u32, offset: i64, len: u32) -> u32 {
    (center as i64 + offset).clamp(0, len as i64 - 1) as u32
}

fn window<'a>(
    texels: &'a [[f64; 4]],
    dims: Dimensions,
    (x, y, z): (u32, u32, u32),
    radius: u32,
) -> impl Iterator<Item = &'a [f64; 4]> + 'a {
    let r = radius as i64;
    let rz = if dims.is_volumetric() { r } else { 0 };
    (-rz..=rz).flat_map(move |dz| {
        (-r..=r).flat_map(move |dy| {
            (-r..=r).map(move |dx| {
                let i = dims.index(
                    clamp_axis(x, dx, dims.width()),
                    clamp_axis(y, dy, dims.height()),
                    clamp_axis(z, dz, dims.depth()),
                );
                &texels[i]
            })
        })
    })
}

/// Windowed mean and sample variance of texel `(x, y, z)`.
///
/// `texels` holds decoded RGBA values in image order. The variance uses the
/// `n - 1` divisor and is zero for a single-sample window. The z extent of
/// the window is only used for volumetric images.
pub fn reference_window_stats(
    texels: &[[f64; 4]],
    dims: Dimensions,
    x: u32,
    y: u32,
    z: u32,
    avg_var_radius: u32,
    alpha_radius: u32,
) -> ReferenceStats {
    let mut sum = [0.0f64; 4];
    let mut n = 0usize;
    for t in window(texels, dims, (x, y, z), avg_var_radius) {
        for c in 0..4 {
            sum[c] += t[c];
        }
        n += 1;
    }
    let average = sum.map(|s| s / n as f64);

    let mut sq = [0.0f64; 4];
    for t in window(texels, dims, (x, y, z), avg_var_radius) {
        for c in 0..4 {
            let d = t[c] - average[c];
            sq[c] += d * d;
        }
    }
    let variance = if n > 1 {
        sq.map(|s| s / (n - 1) as f64)
    } else {
        [0.0; 4]
    };

    let (alpha_sum, alpha_n) = window(texels, dims, (x, y, z), alpha_radius)
        .fold((0.0, 0usize), |(s, n), t| (s + t[3], n + 1));

    ReferenceStats {
        average,
        variance,
        alpha_average: alpha_sum / alpha_n as f64,
    }
}

/// Reference statistics for every texel, in image order.
pub fn reference_image_stats(
    texels: &[[f64; 4]],
    dims: Dimensions,
    avg_var_radius: u32,
    alpha_radius: u32,
) -> Vec<ReferenceStats> {
    let mut out = Vec::with_capacity(dims.pixel_count());
    for z in 0..dims.depth() {
        for y in 0..dims.height() {
            for x in 0..dims.width() {
                out.push(reference_window_stats(
                    texels,
                    dims,
                    x,
                    y,
                    z,
                    avg_var_radius,
                    alpha_radius,
                ));
            }
        }
    }
    out
}

/// Apply the power-law channel weighting used by the sampler.
///
/// Channels are floored at `1e-6` before raising; powers of exactly 1 leave
/// the texels untouched.
pub fn weighted(texels: &[[f64; 4]], rgb_power: f32, alpha_power: f32) -> Vec<[f64; 4]> {
    if rgb_power == 1.0 && alpha_power == 1.0 {
        return texels.to_vec();
    }
    let pow = |c: f64, p: f32| c.max(1e-6).powf(p as f64);
    texels
        .iter()
        .map(|t| {
            [
                pow(t[0], rgb_power),
                pow(t[1], rgb_power),
                pow(t[2], rgb_power),
                pow(t[3], alpha_power),
            ]
        })
        .collect()
}
