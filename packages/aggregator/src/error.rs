//! Typed errors for the aggregation engine.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Only [`AggregatorError`] ever reaches a caller of the aggregation
//! pipeline. [`FetchError`] is recovered inside each source adapter and
//! turned into an empty contribution.

use thiserror::Error;

/// Errors that can escape an aggregation run or a store read.
#[derive(Debug, Error)]
pub enum AggregatorError {
    /// Storage operation failed (evict, insert, query)
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Invalid query provided
    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

impl AggregatorError {
    /// Wrap any storage backend error.
    pub fn storage(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage(err.into())
    }
}

/// Errors that can occur while fetching a listing page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, TLS, connection reset, ...)
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// Request did not complete within its timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Search URL could not be built or parsed
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Response body could not be read
    #[error("failed to read body from {url}: {reason}")]
    Body { url: String, reason: String },
}

/// Result type alias for aggregation operations.
pub type Result<T> = std::result::Result<T, AggregatorError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
