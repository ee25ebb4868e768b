//! Error types for texstat-core
//!
//! Provides a unified error type for validating caller-supplied data in the
//! core crate. Each variant captures enough context for diagnostics without
//! exposing internal implementation details.
//!
//! Only construction-time checks produce these errors. Once an
//! [`ImageView`](crate::ImageView) or [`StatsBuffers`](crate::StatsBuffers)
//! exists it is valid for its whole lifetime.

use thiserror::Error;

/// texstat error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}x{depth}")]
    InvalidDimension { width: u32, height: u32, depth: u32 },

    /// Pixel storage length does not match the declared dimensions
    #[error("pixel data length {actual} doesn't match {expected} ({width}x{height}x{depth}x4)")]
    DataLengthMismatch {
        width: u32,
        height: u32,
        depth: u32,
        expected: usize,
        actual: usize,
    },

    /// Image dimension mismatch
    #[error(
        "dimension mismatch: expected {}x{}x{}, got {}x{}x{}",
        .expected.0, .expected.1, .expected.2, .actual.0, .actual.1, .actual.2
    )]
    DimensionMismatch {
        expected: (u32, u32, u32),
        actual: (u32, u32, u32),
    },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Result type alias for texstat core operations
pub type Result<T> = std::result::Result<T, Error>;
