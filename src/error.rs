//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for every cache backend.
///
/// Transport failures from the document store are surfaced verbatim
/// (`Database`) rather than folded into one of the cache-level kinds.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key was never set, has been deleted, or has expired
    #[error("cache: key not found: {0}")]
    KeyNotFound(String),

    /// Value could not be encoded for storage
    #[error("cache: marshal error: {0}")]
    Marshal(#[source] serde_json::Error),

    /// Stored payload could not be decoded into the requested type
    #[error("cache: unmarshal error: {0}")]
    Unmarshal(#[source] serde_json::Error),

    /// MongoDB driver error (connectivity, query failure, ...)
    #[cfg(feature = "mongodb")]
    #[error(transparent)]
    Database(#[from] mongodb::error::Error),

    /// Failure reported by a non-MongoDB document collection
    #[error("cache: backend error: {0}")]
    Backend(String),

    /// Invalid store configuration
    #[error("cache: invalid configuration: {0}")]
    Config(String),
}

impl CacheError {
    /// Returns true for read misses (including lazily expired entries).
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::KeyNotFound(_))
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
