//! texstat-test - Regression test framework for texstat
//!
//! This crate provides the regression harness used by the integration tests
//! of the texstat crates, together with deterministic image generators and a
//! brute-force oracle for windowed statistics:
//!
//! - **Compare**: Record every mismatch as a failure (default)
//! - **Display**: Print every comparison without failing
//!
//! # Usage
//!
//! ```ignore
//! use texstat_test::{RegParams, gradient_u8, reference_window_stats};
//!
//! let mut rp = RegParams::new("variance");
//! let img = gradient_u8(dims);
//! let expected = reference_window_stats(&img.decoded(), dims, 3, 4, 0, 2, 1);
//! rp.compare_values(expected.average[0], stats.average(3, 4, 0).unwrap().r as f64, 1e-4);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod error;
mod generators;
mod params;
mod reference;

pub use error::{TestError, TestResult};
pub use generators::{TestImage, TexelStore, constant_u8, gradient_u8, noise_f32, to_f16};
pub use params::{RegParams, RegTestMode};
pub use reference::{ReferenceStats, reference_image_stats, reference_window_stats, weighted};
