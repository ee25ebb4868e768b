//! Summed-area tables over padded work buffers
//!
//! For one region, the work buffers hold the region plus a halo of
//! `kernel_radius` texels on each side of every active axis, read with
//! coordinates clamped to the image so the halo repeats edge texels. A
//! leading zero column, row and (for volumes) slice forms the table edge.
//!
//! After [`WorkBuffers::build`], element `(z, y, x)` of each buffer holds
//! the sum over `[1, z] x [1, y] x [1, x]` of the loaded values (or their
//! squares), so any box sum is an inclusion-exclusion of its corners:
//!
//! ```text
//! sum(lo, hi] = S(hi) - S(lo)            per axis
//! 2D: S(yh,xh) - S(yh,xl) - S(yl,xh) + S(yl,xl)
//! 3D: the 2D expression at zh minus the same at zl
//! ```
//!
//! The prefix passes run along X, then Y, then Z using
//! [`brent_kung_prefix_sum`].

use crate::prefix_sum::brent_kung_prefix_sum;
use crate::sample::ChannelSampler;
use crate::tile::{PaddedExtent, Region, TileGeometry};
use texstat_core::Float4;

/// Scratch buffers owned by one worker for a whole invocation
#[derive(Debug)]
pub struct WorkBuffers {
    values: Vec<Float4>,
    squares: Vec<Float4>,
}

impl WorkBuffers {
    /// Allocate two zeroed buffers of `len` elements each.
    pub fn new(len: usize) -> Self {
        Self {
            values: vec![Float4::ZERO; len],
            squares: vec![Float4::ZERO; len],
        }
    }

    /// Elements per buffer
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Load `region` (with halo) from `sampler` and turn both buffers into
    /// summed-area tables.
    ///
    /// # Panics
    ///
    /// Panics if the padded region does not fit in the buffers.
    pub fn build(
        &mut self,
        sampler: &ChannelSampler<'_>,
        geometry: &TileGeometry,
        region: &Region,
    ) -> SummedAreaTable<'_> {
        let ext = geometry.padded_extent(region);
        assert!(
            ext.volume() <= self.len(),
            "padded region {ext:?} exceeds work buffer of {} elements",
            self.len()
        );
        let has_z = geometry.has_z();

        self.load(sampler, geometry, region, ext);
        self.zero_edges(ext, has_z);
        self.prefix_sum_axes(ext, has_z);

        SummedAreaTable {
            values: &self.values,
            squares: &self.squares,
            ext,
            has_z,
        }
    }

    fn load(
        &mut self,
        sampler: &ChannelSampler<'_>,
        geometry: &TileGeometry,
        region: &Region,
        ext: PaddedExtent,
    ) {
        let (w, h, d) = geometry.dims().as_tuple();
        let r = geometry.kernel_radius() as i64;
        let has_z = geometry.has_z();
        let z_start = usize::from(has_z);
        let r_z = if has_z { r } else { 0 };

        // Source columns are the same for every row.
        let x_src: Vec<u32> = (1..ext.x)
            .map(|x| clamp_src(x as i64 - 1 + region.x as i64 - r, w))
            .collect();

        for z in z_start..ext.z {
            let z_src = clamp_src((z - z_start) as i64 + region.z as i64 - r_z, d);
            for y in 1..ext.y {
                let y_src = clamp_src(y as i64 - 1 + region.y as i64 - r, h);
                let row = ext.index(1, y, z);
                for (i, &xs) in x_src.iter().enumerate() {
                    let v = sampler.sample(xs, y_src, z_src);
                    self.values[row + i] = v;
                    self.squares[row + i] = v * v;
                }
            }
        }
    }

    fn zero_edges(&mut self, ext: PaddedExtent, has_z: bool) {
        for buf in [&mut self.values, &mut self.squares] {
            for z in 0..ext.z {
                for y in 0..ext.y {
                    buf[ext.index(0, y, z)] = Float4::ZERO;
                }
                let row = ext.index(0, 0, z);
                buf[row..row + ext.x].fill(Float4::ZERO);
            }
            if has_z {
                buf[..ext.slice_stride()].fill(Float4::ZERO);
            }
        }
    }

    fn prefix_sum_axes(&mut self, ext: PaddedExtent, has_z: bool) {
        let z_start = usize::from(has_z);
        let yst = ext.row_stride();
        let zst = ext.slice_stride();

        for buf in [&mut self.values, &mut self.squares] {
            for z in z_start..ext.z {
                for y in 1..ext.y {
                    brent_kung_prefix_sum(buf, ext.index(1, y, z), ext.x - 1, 1);
                }
            }

            for z in z_start..ext.z {
                for x in 1..ext.x {
                    brent_kung_prefix_sum(buf, ext.index(x, 1, z), ext.y - 1, yst);
                }
            }

            if has_z {
                for y in 1..ext.y {
                    for x in 1..ext.x {
                        brent_kung_prefix_sum(buf, ext.index(x, y, 1), ext.z - 1, zst);
                    }
                }
            }
        }
    }
}

#[inline]
fn clamp_src(v: i64, dim: u32) -> u32 {
    v.clamp(0, dim as i64 - 1) as u32
}

/// Half-open box in padded-buffer coordinates: `(lo, hi]` per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SatWindow {
    pub lo: [usize; 3],
    pub hi: [usize; 3],
}

impl SatWindow {
    /// Window of `radius` around the texel whose region-local position is
    /// `center - kernel_radius` on each axis.
    ///
    /// `center` is the local coordinate plus the kernel radius the tables
    /// were padded for; the window then covers cells `center+1-radius ..=
    /// center+1+radius`. For 2D tables pass `z = 0` and `radius_z = 0`.
    #[inline]
    pub fn around(center: [usize; 3], radius: usize, radius_z: usize) -> Self {
        Self {
            lo: [center[0] - radius, center[1] - radius, center[2] - radius_z],
            hi: [
                center[0] + radius + 1,
                center[1] + radius + 1,
                center[2] + radius_z + 1,
            ],
        }
    }
}

/// Read-only view of the two built summed-area tables
#[derive(Debug, Clone, Copy)]
pub struct SummedAreaTable<'a> {
    values: &'a [Float4],
    squares: &'a [Float4],
    ext: PaddedExtent,
    has_z: bool,
}

impl SummedAreaTable<'_> {
    /// Padded extent of the tables
    #[cfg(test)]
    fn extent(&self) -> PaddedExtent {
        self.ext
    }

    /// Table entry of the value table at `(x, y, z)`
    #[cfg(test)]
    fn value_at(&self, x: usize, y: usize, z: usize) -> Float4 {
        self.values[self.ext.index(x, y, z)]
    }

    /// Sum of values inside `win`.
    #[inline]
    pub fn box_sum(&self, win: &SatWindow) -> Float4 {
        self.sum_in(self.values, win)
    }

    /// Sum of squared values inside `win`.
    #[inline]
    pub fn box_sum_squares(&self, win: &SatWindow) -> Float4 {
        self.sum_in(self.squares, win)
    }

    #[inline]
    fn sum_in(&self, t: &[Float4], win: &SatWindow) -> Float4 {
        let [xl, yl, zl] = win.lo;
        let [xh, yh, zh] = win.hi;
        let plane = |z: usize| {
            t[self.ext.index(xh, yh, z)] - t[self.ext.index(xl, yh, z)]
                - t[self.ext.index(xh, yl, z)]
                + t[self.ext.index(xl, yl, z)]
        };
        if self.has_z {
            plane(zh) - plane(zl)
        } else {
            plane(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileSize;
    use texstat_core::{Dimensions, ImageView, Swizzle};

    fn ramp(dims: Dimensions) -> Vec<f32> {
        (0..dims.pixel_count())
            .flat_map(|i| {
                let v = i as f32;
                [v, 1.0, v * 0.5, 2.0]
            })
            .collect()
    }

    #[test]
    fn test_sat_2d_matches_direct_sum() {
        let dims = Dimensions::new_2d(5, 4).unwrap();
        let data = ramp(dims);
        let view = ImageView::from_f32(dims, &data).unwrap();
        let sampler = ChannelSampler::new(view, Swizzle::IDENTITY, 1.0, 1.0);
        let g = TileGeometry::new(dims, TileSize::new(8, 8, 1), 0);
        let region = g.task(0);
        let mut wb = WorkBuffers::new(g.work_buffer_len());
        let sat = wb.build(&sampler, &g, &region);

        // radius 0: padded extent is size + 1, table entry (x,y) sums [0,x-1]x[0,y-1]
        assert_eq!(sat.extent(), PaddedExtent { x: 6, y: 5, z: 1 });
        assert_eq!(sat.value_at(0, 3, 0), Float4::ZERO);
        assert_eq!(sat.value_at(2, 0, 0), Float4::ZERO);
        // sum of texels (0..2, 0..2) -> 0+1+5+6 = 12 in red, count 4 in green
        assert_eq!(sat.value_at(2, 2, 0).r, 12.0);
        assert_eq!(sat.value_at(2, 2, 0).g, 4.0);
        assert_eq!(sat.value_at(5, 4, 0).g, 20.0);

        // single texel (2, 2) = 12
        let win = SatWindow::around([2, 2, 0], 0, 0);
        assert_eq!(sat.box_sum(&win).r, 12.0);
        assert_eq!(sat.box_sum_squares(&win).r, 144.0);
    }

    #[test]
    fn test_sat_halo_repeats_edges() {
        let dims = Dimensions::new_2d(2, 1).unwrap();
        let data = [1.0f32, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0];
        let view = ImageView::from_f32(dims, &data).unwrap();
        let sampler = ChannelSampler::new(view, Swizzle::IDENTITY, 1.0, 1.0);
        let g = TileGeometry::new(dims, TileSize::new(8, 8, 1), 2);
        let mut wb = WorkBuffers::new(g.work_buffer_len());
        let sat = wb.build(&sampler, &g, &g.task(0));

        // padded row: 1 1 1 3 3 3 (two halo texels each side)
        let ext = sat.extent();
        assert_eq!(ext.x, 7);
        assert_eq!(sat.value_at(6, 1, 0).r, 12.0);
        // all 5 padded rows are copies of the single image row
        assert_eq!(sat.value_at(6, 5, 0).r, 60.0);
    }

    #[test]
    fn test_sat_3d_box_sum() {
        let dims = Dimensions::new(3, 3, 3).unwrap();
        let data: Vec<f32> = (0..dims.pixel_count())
            .flat_map(|_| [1.0f32, 0.0, 0.0, 0.0])
            .collect();
        let view = ImageView::from_f32(dims, &data).unwrap();
        let sampler = ChannelSampler::new(view, Swizzle::IDENTITY, 1.0, 1.0);
        let g = TileGeometry::new(dims, TileSize::new(4, 4, 4), 1);
        let mut wb = WorkBuffers::new(g.work_buffer_len());
        let sat = wb.build(&sampler, &g, &g.task(0));

        assert_eq!(sat.extent(), PaddedExtent { x: 6, y: 6, z: 6 });
        // zero slice at z = 0
        assert_eq!(sat.value_at(5, 5, 0), Float4::ZERO);
        assert_eq!(sat.value_at(5, 5, 5).r, 125.0);

        let win = SatWindow::around([3, 3, 3], 1, 1);
        assert_eq!(sat.box_sum(&win).r, 27.0);
        assert_eq!(sat.box_sum_squares(&win).r, 27.0);
    }
}
