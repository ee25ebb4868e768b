//! texstat Core - Basic data structures for local image statistics
//!
//! This crate provides the data model shared by the texstat crates:
//!
//! - [`ImageView`] / [`Dimensions`] / [`PixelData`] - Read-only view of a
//!   2D or volumetric RGBA image in 8-bit, half-float or float storage
//! - [`Swizzle`] / [`SwizzleComponent`] - Per-channel source remapping
//! - [`Float4`] - Four-channel float vector used for decoded texels and sums
//! - [`StatsBuffers`] - Caller-owned per-pixel average/variance outputs

pub mod error;
pub mod float4;
pub mod image;
pub mod stats;
pub mod swizzle;

pub use error::{Error, Result};
pub use float4::Float4;
pub use image::{CHANNELS, Dimensions, ImageView, PixelData, PixelFormat};
pub use stats::StatsBuffers;
pub use swizzle::{Swizzle, SwizzleComponent};

// Re-exported so callers can build half-float views without a direct
// dependency on `half`.
pub use half::f16;
