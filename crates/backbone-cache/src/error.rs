//! Cache key derivation errors.

use thiserror::Error;

/// Reasons a value cannot be turned into a cache key.
///
/// Every variant aborts the whole derivation; no partial key is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("cache key: namespace should not be empty")]
    EmptyNamespace,

    #[error("cache key: field `{field}` should be a struct")]
    NotAStruct { field: String },

    #[error("cache key: field `{field}` cannot be empty")]
    EmptyRequiredField { field: String },

    #[error("cache key: field `{field}` of type `{type_name}` has no deterministic rendering")]
    UnsupportedFieldType {
        field: String,
        type_name: &'static str,
    },
}

/// Error type for cache store operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
