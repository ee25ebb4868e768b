//! Per-pixel averages and variances for texture compression
//!
//! Computes, for every texel, the mean and sample variance of all four
//! channels over a `(2r+1)^d` neighborhood and a separately sized alpha
//! mean, in O(1) per texel regardless of radius.
//!
//! Usage is two-phase:
//!
//! 1. [`AvgVarSetup::new`] validates the parameters, fixes the tile
//!    geometry and reports the task count;
//! 2. [`AvgVarSetup::execute`] fills caller-owned [`StatsBuffers`] using a
//!    pool of workers that pull tasks from a shared [`TaskCursor`].
//!
//! [`compute_averages_and_variances`] does both in one call.
//!
//! # Examples
//!
//! ```
//! use texstat_core::{Dimensions, ImageView};
//! use texstat_filter::{AvgVarConfig, compute_averages_and_variances};
//!
//! let texels = vec![128u8; 8 * 8 * 4];
//! let view = ImageView::from_u8(Dimensions::new_2d(8, 8).unwrap(), &texels).unwrap();
//! let stats = compute_averages_and_variances(view, &AvgVarConfig::new(2, 1)).unwrap();
//! let avg = stats.average(0, 0, 0).unwrap();
//! assert!((avg.r - 128.0 / 255.0).abs() < 1e-5);
//! ```

use std::sync::{Mutex, PoisonError};

use tracing::{debug, trace};

use crate::extract::{KernelConstants, extract_region};
use crate::output::TaskOutput;
use crate::sample::ChannelSampler;
use crate::sat::WorkBuffers;
use crate::schedule::TaskCursor;
use crate::tile::{TileGeometry, TileSize};
use crate::{FilterError, FilterResult};
use texstat_core::{ImageView, StatsBuffers, Swizzle};

/// Parameters of one statistics computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvgVarConfig {
    /// Channel remapping applied before reweighting
    pub swizzle: Swizzle,
    /// Power applied to R, G and B
    pub rgb_power: f32,
    /// Power applied to A
    pub alpha_power: f32,
    /// Half-width of the average/variance window
    pub avg_var_radius: u32,
    /// Half-width of the alpha-only average window
    pub alpha_radius: u32,
    /// Tile extent override; `None` picks 32x32 (2D) or 16x16x16 (3D)
    pub tile_size: Option<TileSize>,
    /// Tasks claimed per cursor fetch
    pub task_batch: usize,
    /// Worker threads; 0 uses rayon's current thread count
    pub threads: usize,
}

impl Default for AvgVarConfig {
    fn default() -> Self {
        Self {
            swizzle: Swizzle::IDENTITY,
            rgb_power: 1.0,
            alpha_power: 1.0,
            avg_var_radius: 0,
            alpha_radius: 0,
            tile_size: None,
            task_batch: 1,
            threads: 0,
        }
    }
}

impl AvgVarConfig {
    /// Default configuration with the given window radii.
    pub fn new(avg_var_radius: u32, alpha_radius: u32) -> Self {
        Self {
            avg_var_radius,
            alpha_radius,
            ..Self::default()
        }
    }

    pub fn with_swizzle(mut self, swizzle: Swizzle) -> Self {
        self.swizzle = swizzle;
        self
    }

    pub fn with_powers(mut self, rgb_power: f32, alpha_power: f32) -> Self {
        self.rgb_power = rgb_power;
        self.alpha_power = alpha_power;
        self
    }

    pub fn with_tile_size(mut self, tile_size: TileSize) -> Self {
        self.tile_size = Some(tile_size);
        self
    }

    pub fn with_task_batch(mut self, task_batch: usize) -> Self {
        self.task_batch = task_batch;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Largest of the two radii; the work buffers are padded for it.
    pub fn kernel_radius(&self) -> u32 {
        self.avg_var_radius.max(self.alpha_radius)
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> FilterResult<()> {
        for (name, p) in [("rgb_power", self.rgb_power), ("alpha_power", self.alpha_power)] {
            if !p.is_finite() || p <= 0.0 {
                return Err(FilterError::InvalidParameters(format!(
                    "{name} must be finite and > 0, got {p}"
                )));
            }
        }
        if let Some(t) = self
            .tile_size
            .filter(|t| t.x == 0 || t.y == 0 || t.z == 0)
        {
            return Err(FilterError::InvalidParameters(format!(
                "tile extents must be >= 1, got {}x{}x{}",
                t.x, t.y, t.z
            )));
        }
        if self.task_batch == 0 {
            return Err(FilterError::InvalidParameters(
                "task_batch must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

/// Validated, ready-to-run statistics computation for one image
#[derive(Debug, Clone, Copy)]
pub struct AvgVarSetup<'a> {
    sampler: ChannelSampler<'a>,
    geometry: TileGeometry,
    constants: KernelConstants,
    task_batch: usize,
    threads: usize,
}

impl<'a> AvgVarSetup<'a> {
    /// Validate `config` against `view` and derive the tile geometry.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidParameters`] if a power is not finite
    /// and positive, a tile extent or the task batch is zero, or the padded
    /// work buffers would not be addressable.
    pub fn new(view: ImageView<'a>, config: &AvgVarConfig) -> FilterResult<Self> {
        config.validate()?;

        let dims = view.dims();
        let tile = config.tile_size.unwrap_or_else(|| TileSize::for_image(dims));
        let kernel_radius = config.kernel_radius();
        let geometry = TileGeometry::new(dims, tile, kernel_radius);
        check_work_buffer_len(&geometry)?;

        let threads = match config.threads {
            0 => rayon::current_num_threads(),
            n => n,
        }
        .clamp(1, geometry.task_count().max(1));

        debug!(
            width = dims.width(),
            height = dims.height(),
            depth = dims.depth(),
            volumetric = dims.is_volumetric(),
            tile = ?geometry.tile(),
            kernel_radius,
            work_buffer_len = geometry.work_buffer_len(),
            tasks = geometry.task_count(),
            threads,
            "avg/var setup"
        );

        Ok(Self {
            sampler: ChannelSampler::new(
                view,
                config.swizzle,
                config.rgb_power,
                config.alpha_power,
            ),
            geometry,
            constants: KernelConstants::new(
                config.avg_var_radius,
                config.alpha_radius,
                dims.is_volumetric(),
            ),
            task_batch: config.task_batch.min(geometry.task_count().max(1)),
            threads,
        })
    }

    /// Number of tasks a full execution dispatches
    pub fn task_count(&self) -> usize {
        self.geometry.task_count()
    }

    /// Tile geometry in use
    pub fn geometry(&self) -> &TileGeometry {
        &self.geometry
    }

    /// Elements per work buffer (each worker holds two)
    pub fn work_buffer_len(&self) -> usize {
        self.geometry.work_buffer_len()
    }

    /// Worker threads `execute` will use
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Tasks each worker claims per cursor fetch, capped to the task count
    pub fn task_batch(&self) -> usize {
        self.task_batch
    }

    /// Allocate output buffers sized for this image.
    pub fn new_buffers(&self) -> StatsBuffers {
        StatsBuffers::new(self.geometry.dims())
    }

    /// Fill `buffers` with the statistics of every texel.
    ///
    /// Blocks until all tasks are complete. On success every element of
    /// the three arrays has been written exactly once.
    ///
    /// # Errors
    ///
    /// Returns an error if `buffers` was sized for another image or the
    /// worker pool cannot be built. Nothing is written in either case.
    pub fn execute(&self, buffers: &mut StatsBuffers) -> FilterResult<()> {
        buffers.check_dims(self.geometry.dims())?;

        let slots: Vec<Mutex<Option<TaskOutput<'_>>>> = TaskOutput::split(buffers, &self.geometry)
            .into_iter()
            .map(|out| Mutex::new(Some(out)))
            .collect();
        let cursor = TaskCursor::new(slots.len());

        debug!(tasks = cursor.total(), threads = self.threads, "avg/var execute");

        if self.threads == 1 {
            self.run_worker(&cursor, &slots);
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.threads)
                .thread_name(|i| format!("texstat-avgvar-{i}"))
                .build()
                .map_err(|e| FilterError::ThreadPool(e.to_string()))?;
            pool.scope(|s| {
                for _ in 0..self.threads {
                    s.spawn(|_| self.run_worker(&cursor, &slots));
                }
            });
        }

        debug_assert!(cursor.is_done());
        debug!(completed = cursor.completed(), "avg/var done");
        Ok(())
    }

    /// Pull tasks until the cursor is exhausted. The work buffers live for
    /// the whole loop and are released when it returns.
    fn run_worker(&self, cursor: &TaskCursor, slots: &[Mutex<Option<TaskOutput<'_>>>]) {
        let mut work = WorkBuffers::new(self.geometry.work_buffer_len());

        while let Some(batch) = cursor.claim(self.task_batch) {
            trace!(tasks = ?batch, "claimed");
            let count = batch.len();
            for index in batch {
                let taken = slots[index]
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .take();
                let Some(mut out) = taken else {
                    panic!("task {index} dispatched twice");
                };
                self.process_task(&mut work, &mut out);
            }
            cursor.complete(count);
        }
    }

    fn process_task(&self, work: &mut WorkBuffers, out: &mut TaskOutput<'_>) {
        for region in self.geometry.chunks(out.region()) {
            let sat = work.build(&self.sampler, &self.geometry, &region);
            extract_region(&sat, &self.geometry, &self.constants, &region, out);
        }
    }
}

/// Reject radii whose padded work buffers overflow `usize`.
fn check_work_buffer_len(geometry: &TileGeometry) -> FilterResult<()> {
    let kdim = 2 * geometry.kernel_radius() as u64 + 1;
    let tile = geometry.tile();
    let pad = |t: u32| t as u64 + kdim;
    let z = if geometry.has_z() { pad(tile.z) } else { tile.z as u64 };

    pad(tile.x)
        .checked_mul(pad(tile.y))
        .and_then(|v| v.checked_mul(z))
        .and_then(|v| v.checked_mul(2 * size_of::<texstat_core::Float4>() as u64))
        .and_then(|v| usize::try_from(v).ok())
        .filter(|&bytes| bytes <= isize::MAX as usize)
        .map(|_| ())
        .ok_or_else(|| {
            FilterError::InvalidParameters(format!(
                "kernel radius {} too large for tile {}x{}x{}",
                geometry.kernel_radius(),
                tile.x,
                tile.y,
                tile.z
            ))
        })
}

/// Compute windowed averages and variances for `view` in one call.
///
/// Allocates the output buffers, runs [`AvgVarSetup::execute`] and returns
/// them.
pub fn compute_averages_and_variances(
    view: ImageView<'_>,
    config: &AvgVarConfig,
) -> FilterResult<StatsBuffers> {
    let setup = AvgVarSetup::new(view, config)?;
    let mut buffers = setup.new_buffers();
    setup.execute(&mut buffers)?;
    Ok(buffers)
}
