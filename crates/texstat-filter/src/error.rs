//! Error types for texstat-filter
//!
//! Only parameter validation and worker-pool construction are fallible.
//! Broken internal invariants (a task claimed twice, an out-of-range
//! summed-area lookup) are programming errors and panic instead.

use thiserror::Error;

/// Errors that can occur while setting up or running the statistics engine
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] texstat_core::Error),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Worker pool could not be built
    #[error("thread pool: {0}")]
    ThreadPool(String),
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
