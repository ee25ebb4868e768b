//! Brent–Kung prefix sum
//!
//! Turns a strided run of values `v0, v1, v2, ...` into its inclusive prefix
//! sums `v0, v0+v1, v0+v1+v2, ...` in place.
//!
//! The reduction tree first combines pairs at strides 2, 4, 8, ... into the
//! higher slot of each pair; the distribution tree then walks the strides
//! back down and fills in the remaining slots. Every output depends on at
//! most `O(log n)` additions, which keeps `f32` rounding error far below
//! that of a serial running sum over the same data.

use texstat_core::Float4;

/// In-place inclusive prefix sum over `items` elements of `d`, starting at
/// `start` and spaced `stride` apart.
///
/// # Panics
///
/// Panics if `start + (items - 1) * stride` is out of bounds for `d`.
pub fn brent_kung_prefix_sum(d: &mut [Float4], start: usize, items: usize, stride: usize) {
    if items < 2 {
        return;
    }

    let mut lc_stride = 2usize;
    let mut log2_stride = 1u32;

    // Reduction tree
    loop {
        let step = lc_stride >> 1;
        let first = lc_stride - 1;
        let iters = items >> log2_stride;
        add_strided(d, start + first * stride, iters, step * stride, stride << log2_stride);

        log2_stride += 1;
        lc_stride <<= 1;
        if lc_stride > items {
            break;
        }
    }

    // Distribution tree
    loop {
        log2_stride -= 1;
        lc_stride >>= 1;

        let step = lc_stride >> 1;
        let first = step + lc_stride - 1;
        let iters = (items - step) >> log2_stride;
        add_strided(d, start + first * stride, iters, step * stride, stride << log2_stride);

        if lc_stride <= 2 {
            break;
        }
    }
}

/// `d[i] += d[i - back]` for `iters` positions starting at `at`, `advance`
/// apart.
#[inline]
fn add_strided(d: &mut [Float4], at: usize, iters: usize, back: usize, advance: usize) {
    let mut i = at;
    for _ in 0..iters {
        let prev = d[i - back];
        d[i] += prev;
        i += advance;
    }
}
