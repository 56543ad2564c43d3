//! Error types for load generation.

use thiserror::Error;

/// Result type alias for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors that can occur while generating load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The request asked for more than the configured ceiling allows.
    #[error("{param} {requested} exceeds limit {limit}")]
    LimitExceeded {
        param: &'static str,
        requested: u64,
        limit: u64,
    },

    /// The allocator could not satisfy the request. The previous
    /// ballast block stays in place and the process keeps running.
    #[error("failed to allocate {bytes} bytes of ballast")]
    Allocation { bytes: u64 },
}
