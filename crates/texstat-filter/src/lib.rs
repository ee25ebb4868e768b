//! texstat-filter - Windowed texel statistics for block texture compressors
//!
//! This crate computes, for every texel of a 2D or volumetric image, the
//! local mean and variance of its four channels plus a separately sized
//! alpha mean. Running time is proportional to the image size, not to the
//! window area:
//!
//! - Channel decoding with swizzle and power-law weighting ([`sample`])
//! - Brent–Kung prefix sums ([`prefix_sum`]) building summed-area tables
//!   over halo-padded tiles ([`sat`])
//! - Inclusion-exclusion box queries producing mean and variance
//!   ([`extract`])
//! - Tile geometry, per-task output ownership and lock-free task dispatch
//!   ([`tile`], [`output`], [`schedule`])
//! - The setup/execute entry points ([`variance`])

mod error;
pub mod extract;
pub mod output;
pub mod prefix_sum;
pub mod sample;
pub mod sat;
pub mod schedule;
pub mod tile;
pub mod variance;

pub use error::{FilterError, FilterResult};

// Re-export commonly used items
pub use sample::ChannelSampler;
pub use schedule::TaskCursor;
pub use tile::{TileGeometry, TileSize};
pub use variance::{AvgVarConfig, AvgVarSetup, compute_averages_and_variances};
