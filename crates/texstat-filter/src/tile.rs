//! Tile geometry
//!
//! The image is cut into row bands (one band = `tile.y` rows across the
//! full width, times `tile.z` slices). Each band is one parallel task and is
//! processed as successive chunks of `tile.x` columns. Every chunk gets a
//! halo of `2 * radius + 1` texels per active axis in the work buffers, so
//! the tile extents bound the working memory regardless of image size.
//!
//! Task numbering is slab-major: `index = z_band * y_tasks + y_band`.

use texstat_core::Dimensions;

/// Default tile extent in X and Y for 2D images.
pub const TILE_XY_2D: u32 = 32;
/// Default tile extent in X, Y and Z for volumetric images.
pub const TILE_XYZ_3D: u32 = 16;

/// Tile extent per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSize {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl TileSize {
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Default extent for an image: 16x16x16 tiles for volumes, 32x32 flat
    /// tiles otherwise, with Z clamped to the image depth.
    pub fn for_image(dims: Dimensions) -> Self {
        if dims.is_volumetric() {
            Self::new(TILE_XYZ_3D, TILE_XYZ_3D, TILE_XYZ_3D.min(dims.depth()))
        } else {
            Self::new(TILE_XY_2D, TILE_XY_2D, 1)
        }
    }
}

/// Axis-aligned box of texels in image space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

/// Padded work-buffer extent for one region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddedExtent {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl PaddedExtent {
    /// Elements in one work buffer
    #[inline]
    pub fn volume(&self) -> usize {
        self.x * self.y * self.z
    }

    /// Distance between rows
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.x
    }

    /// Distance between slices
    #[inline]
    pub fn slice_stride(&self) -> usize {
        self.x * self.y
    }

    /// Buffer index of `(x, y, z)`
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        z * self.slice_stride() + y * self.row_stride() + x
    }
}

/// Fixed tiling of one image for one kernel radius
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGeometry {
    dims: Dimensions,
    tile: TileSize,
    kernel_radius: u32,
    y_tasks: usize,
    z_tasks: usize,
}

impl TileGeometry {
    /// Tile `dims` with extents `tile`, padding for `kernel_radius`.
    ///
    /// For 2D images the Z extent is forced to 1. Extents must be non-zero.
    pub fn new(dims: Dimensions, tile: TileSize, kernel_radius: u32) -> Self {
        debug_assert!(tile.x > 0 && tile.y > 0 && tile.z > 0);
        let tile = if dims.is_volumetric() {
            TileSize::new(tile.x, tile.y, tile.z.min(dims.depth()))
        } else {
            TileSize::new(tile.x, tile.y, 1)
        };
        let y_tasks = dims.height().div_ceil(tile.y) as usize;
        let z_tasks = dims.depth().div_ceil(tile.z) as usize;
        Self {
            dims,
            tile,
            kernel_radius,
            y_tasks,
            z_tasks,
        }
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn tile(&self) -> TileSize {
        self.tile
    }

    /// Radius the work buffers are padded for
    pub fn kernel_radius(&self) -> u32 {
        self.kernel_radius
    }

    /// True when Z is an active axis
    #[inline]
    pub fn has_z(&self) -> bool {
        self.dims.is_volumetric()
    }

    /// Number of row bands per slab
    pub fn y_tasks(&self) -> usize {
        self.y_tasks
    }

    /// Number of slabs
    pub fn z_tasks(&self) -> usize {
        self.z_tasks
    }

    /// Total number of tasks
    pub fn task_count(&self) -> usize {
        self.y_tasks * self.z_tasks
    }

    /// Full kernel extent `2 * radius + 1`
    #[inline]
    pub fn kernel_dim(&self) -> usize {
        2 * self.kernel_radius as usize + 1
    }

    /// Image-space region covered by task `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= task_count()`.
    pub fn task(&self, index: usize) -> Region {
        assert!(
            index < self.task_count(),
            "task {index} out of range ({} tasks)",
            self.task_count()
        );
        let z = (index / self.y_tasks) as u32 * self.tile.z;
        let y = (index % self.y_tasks) as u32 * self.tile.y;
        Region {
            x: 0,
            y,
            z,
            width: self.dims.width(),
            height: self.tile.y.min(self.dims.height() - y),
            depth: self.tile.z.min(self.dims.depth() - z),
        }
    }

    /// Split a task region into chunks of at most `tile.x` columns.
    pub fn chunks(&self, task: Region) -> impl Iterator<Item = Region> + use<> {
        let step = self.tile.x;
        (0..task.width).step_by(step as usize).map(move |x| Region {
            x: task.x + x,
            width: step.min(task.width - x),
            ..task
        })
    }

    /// Work-buffer extent for a region: one leading zero row/column/slice
    /// plus the kernel halo on each active axis.
    pub fn padded_extent(&self, region: &Region) -> PaddedExtent {
        let kdim = self.kernel_dim();
        PaddedExtent {
            x: region.width as usize + kdim,
            y: region.height as usize + kdim,
            z: region.depth as usize + if self.has_z() { kdim } else { 0 },
        }
    }

    /// Elements needed in each work buffer for the largest possible region.
    pub fn work_buffer_len(&self) -> usize {
        self.padded_extent(&Region {
            x: 0,
            y: 0,
            z: 0,
            width: self.tile.x,
            height: self.tile.y,
            depth: self.tile.z,
        })
        .volume()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tile_sizes() {
        let flat = Dimensions::new_2d(100, 100).unwrap();
        assert_eq!(TileSize::for_image(flat), TileSize::new(32, 32, 1));
        let vol = Dimensions::new(64, 64, 4).unwrap();
        assert_eq!(TileSize::for_image(vol), TileSize::new(16, 16, 4));
        let deep = Dimensions::new(8, 8, 40).unwrap();
        assert_eq!(TileSize::for_image(deep), TileSize::new(16, 16, 16));
    }

    #[test]
    fn test_task_count_2d() {
        let dims = Dimensions::new_2d(100, 70).unwrap();
        let g = TileGeometry::new(dims, TileSize::for_image(dims), 3);
        assert_eq!(g.y_tasks(), 3);
        assert_eq!(g.z_tasks(), 1);
        assert_eq!(g.task_count(), 3);
        let last = g.task(2);
        assert_eq!((last.y, last.height, last.width), (64, 6, 100));
    }

    #[test]
    fn test_task_decomposition_3d() {
        let dims = Dimensions::new(20, 40, 20).unwrap();
        let g = TileGeometry::new(dims, TileSize::for_image(dims), 1);
        // 3 bands of y, 2 slabs of z
        assert_eq!(g.task_count(), 6);
        let t = g.task(4);
        assert_eq!((t.y, t.z), (16, 16));
        assert_eq!((t.height, t.depth), (16, 4));
    }

    #[test]
    fn test_tasks_cover_image_once() {
        let dims = Dimensions::new(37, 23, 9).unwrap();
        let g = TileGeometry::new(dims, TileSize::new(8, 5, 4), 2);
        let mut hits = vec![0u8; dims.pixel_count()];
        for i in 0..g.task_count() {
            for c in g.chunks(g.task(i)) {
                for z in c.z..c.z + c.depth {
                    for y in c.y..c.y + c.height {
                        for x in c.x..c.x + c.width {
                            hits[dims.index(x, y, z)] += 1;
                        }
                    }
                }
            }
        }
        assert!(hits.iter().all(|&h| h == 1));
    }

    #[test]
    fn test_chunks() {
        let dims = Dimensions::new_2d(70, 10).unwrap();
        let g = TileGeometry::new(dims, TileSize::for_image(dims), 0);
        let widths: Vec<u32> = g.chunks(g.task(0)).map(|c| c.width).collect();
        assert_eq!(widths, vec![32, 32, 6]);
    }

    #[test]
    fn test_work_buffer_len() {
        let flat = Dimensions::new_2d(100, 100).unwrap();
        let g = TileGeometry::new(flat, TileSize::for_image(flat), 2);
        assert_eq!(g.work_buffer_len(), 37 * 37);

        let vol = Dimensions::new(64, 64, 64).unwrap();
        let g = TileGeometry::new(vol, TileSize::for_image(vol), 1);
        assert_eq!(g.work_buffer_len(), 19 * 19 * 19);
    }
}
