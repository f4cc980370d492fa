//! Error types for the cache
//!
//! Provides unified error handling using thiserror. Only construction and
//! configuration can fail; the data path folds every failure into "absent".

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache construction and configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity must hold at least one entry
    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    /// Default TTL must be non-zero
    #[error("Invalid default TTL: must be greater than zero")]
    InvalidTtl,

    /// Cleanup interval must be non-zero
    #[error("Invalid cleanup interval: must be greater than zero")]
    InvalidCleanupInterval,

    /// The background sweeper needs a tokio runtime to be spawned on
    #[error("No tokio runtime available to run the cleanup task")]
    NoRuntime,

    /// An environment variable was present but could not be parsed
    #[error("Invalid configuration value for {var}: {value:?}")]
    Config { var: String, value: String },
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
