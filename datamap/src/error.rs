//! Error types for the mapping layer.
//!
//! Data-shape problems inside a field are never errors here; they surface
//! as [`ConversionWarning`](crate::ConversionWarning)s. These variants
//! cover structural misuse and configuration.

use thiserror::Error;

/// Result type for mapping operations.
pub type MapResult<T> = Result<T, MapError>;

/// Errors raised by map construction and strict loads.
#[derive(Debug, Error)]
pub enum MapError {
    /// A source column has no registered strategy and the map rejects those.
    #[error("unmapped column: {0}")]
    UnmappedColumn(String),

    /// Invalid map configuration.
    #[error("invalid map config: {0}")]
    Config(String),

    /// Invalid date format string.
    #[error("invalid date format: {0}")]
    DateFormat(String),

    /// Value model error (currency codes, amounts).
    #[error("value error: {0}")]
    Types(#[from] datamap_types::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
