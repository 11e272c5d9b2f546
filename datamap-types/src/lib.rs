//! Core value types for datamap.
//!
//! This crate defines the storage-agnostic types every field strategy
//! speaks in:
//! - [`FieldValue`]: a typed domain value (text, numbers, dates, money, JSON)
//! - [`Money`] and [`Currency`]: minor-unit amounts paired with an ISO code
//! - [`Access`]: the read/write participation flags of a mapped field
//!
//! Nothing here knows about rows, columns or strategies; see the `datamap`
//! crate for the mapping layer itself.

mod access;
mod money;
mod value;

pub use access::Access;
pub use money::{Currency, Money};
pub use value::{FieldValue, FromFieldValue};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in value operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
