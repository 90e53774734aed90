//! Error types for the replicated cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache nodes and the coordination bus.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Value could not be encoded; the write was aborted
    #[error("Failed to serialize value for key {key}: {reason}")]
    Serialization { key: String, reason: String },

    /// Stored representation could not be decoded
    #[error("Failed to deserialize value for key {key}: {reason}")]
    Deserialization { key: String, reason: String },

    /// Store has no room and nothing to evict (zero capacity)
    #[error("Cache full, cannot store key: {0}")]
    CacheFull(String),

    /// Configuration rejected at startup
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
