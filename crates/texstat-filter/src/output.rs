//! Per-task output ownership
//!
//! The three output arrays are split into one [`TaskOutput`] per task
//! before any worker starts. A task owns, for every z slice it covers, the
//! contiguous run of full-width rows of its band: an [`OutputBand`]. The
//! bands come from `chunks_mut`, so no two tasks can alias an output index.

use crate::tile::{Region, TileGeometry};
use texstat_core::{Float4, StatsBuffers};

/// Full-width rows `[y, y + rows)` of slice `z` in all three output arrays
#[derive(Debug)]
pub struct OutputBand<'a> {
    pub z: u32,
    pub y: u32,
    width: usize,
    pub averages: &'a mut [Float4],
    pub variances: &'a mut [Float4],
    pub alpha_averages: &'a mut [f32],
}

impl OutputBand<'_> {
    /// Index inside this band of image texel `(x, y)` (same slice).
    #[inline]
    pub fn local_index(&self, x: u32, y: u32) -> usize {
        (y - self.y) as usize * self.width + x as usize
    }

    /// Store the statistics of one texel.
    #[inline]
    pub fn write(&mut self, x: u32, y: u32, average: Float4, variance: Float4, alpha_average: f32) {
        let i = self.local_index(x, y);
        self.averages[i] = average;
        self.variances[i] = variance;
        self.alpha_averages[i] = alpha_average;
    }
}

/// All output storage owned by one task
#[derive(Debug)]
pub struct TaskOutput<'a> {
    region: Region,
    bands: Vec<OutputBand<'a>>,
}

impl<'a> TaskOutput<'a> {
    /// Image-space region this output covers
    pub fn region(&self) -> Region {
        self.region
    }

    /// Band for image slice `z`.
    ///
    /// # Panics
    ///
    /// Panics if `z` is outside the task's slab.
    #[inline]
    pub fn band_mut(&mut self, z: u32) -> &mut OutputBand<'a> {
        &mut self.bands[(z - self.region.z) as usize]
    }

    /// Split `buffers` into one output per task of `geometry`, in task
    /// index order.
    ///
    /// `buffers` must be sized for `geometry.dims()`.
    pub fn split(buffers: &'a mut StatsBuffers, geometry: &TileGeometry) -> Vec<TaskOutput<'a>> {
        let dims = geometry.dims();
        debug_assert_eq!(buffers.dims(), dims);

        let width = dims.width() as usize;
        let slice = dims.slice_len();
        let band_len = geometry.tile().y as usize * width;
        let tile_z = geometry.tile().z;
        let y_tasks = geometry.y_tasks();

        let mut outputs: Vec<TaskOutput<'a>> = (0..geometry.task_count())
            .map(|i| TaskOutput {
                region: geometry.task(i),
                bands: Vec::with_capacity(tile_z as usize),
            })
            .collect();

        let (avg, var, alpha) = buffers.parts_mut();
        let slices = avg
            .chunks_mut(slice)
            .zip(var.chunks_mut(slice))
            .zip(alpha.chunks_mut(slice));

        for (z, ((avg_s, var_s), alpha_s)) in slices.enumerate() {
            let z = z as u32;
            let slab = (z / tile_z) as usize;
            let bands = avg_s
                .chunks_mut(band_len)
                .zip(var_s.chunks_mut(band_len))
                .zip(alpha_s.chunks_mut(band_len));

            for (b, ((averages, variances), alpha_averages)) in bands.enumerate() {
                let out = &mut outputs[slab * y_tasks + b];
                out.bands.push(OutputBand {
                    z,
                    y: out.region.y,
                    width,
                    averages,
                    variances,
                    alpha_averages,
                });
            }
        }

        outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileSize;
    use texstat_core::Dimensions;

    #[test]
    fn test_split_2d_bands() {
        let dims = Dimensions::new_2d(10, 7).unwrap();
        let g = TileGeometry::new(dims, TileSize::new(4, 3, 1), 1);
        let mut buffers = StatsBuffers::new(dims);
        let outputs = TaskOutput::split(&mut buffers, &g);

        assert_eq!(outputs.len(), 3);
        let lens: Vec<usize> = outputs.iter().map(|o| o.bands[0].averages.len()).collect();
        assert_eq!(lens, vec![30, 30, 10]);
        assert!(outputs.iter().all(|o| o.bands.len() == 1));
        assert_eq!(outputs[2].bands[0].y, 6);
    }

    #[test]
    fn test_split_3d_writes_land_at_image_index() {
        let dims = Dimensions::new(3, 5, 5).unwrap();
        let g = TileGeometry::new(dims, TileSize::new(2, 2, 2), 0);
        let mut buffers = StatsBuffers::new(dims);
        {
            let mut outputs = TaskOutput::split(&mut buffers, &g);
            assert_eq!(outputs.len(), g.task_count());
            for out in outputs.iter_mut() {
                let r = out.region();
                assert_eq!(out.bands.len(), r.depth as usize);
                for z in r.z..r.z + r.depth {
                    for y in r.y..r.y + r.height {
                        for x in 0..r.width {
                            let tag = dims.index(x, y, z) as f32;
                            out.band_mut(z)
                                .write(x, y, Float4::splat(tag), Float4::ZERO, tag);
                        }
                    }
                }
            }
        }
        for (i, a) in buffers.alpha_averages().iter().enumerate() {
            assert_eq!(*a, i as f32);
        }
    }
}
