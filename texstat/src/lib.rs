//! texstat - Local texel statistics for block texture compressors
//!
//! Computes, for every texel of a 2D or volumetric RGBA image, the mean and
//! variance of its neighbourhood plus a separately sized alpha mean. Block
//! compressors use these to weight their error metrics.
//!
//! # Example
//!
//! ```
//! use texstat::{Dimensions, ImageView};
//! use texstat::filter::{AvgVarConfig, compute_averages_and_variances};
//!
//! let dims = Dimensions::new_2d(4, 4).unwrap();
//! let texels = vec![128u8; 4 * 4 * 4];
//! let view = ImageView::from_u8(dims, &texels).unwrap();
//!
//! let stats = compute_averages_and_variances(view, &AvgVarConfig::new(1, 1)).unwrap();
//! let var = stats.variance(2, 2, 0).unwrap();
//! assert!(var.r.abs() < 1e-6);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use texstat_core::*;

pub use texstat_filter as filter;
