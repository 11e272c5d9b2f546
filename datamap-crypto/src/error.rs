//! Error types for text encryption.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors raised while sealing or opening field text.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("invalid salt: {0}")]
    InvalidSalt(String),

    #[error("key must be {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("encryption failed: {0}")]
    Encryption(String),

    /// The stored value is not sealed text at all (bad base64, truncated).
    #[error("not an encrypted value: {0}")]
    Malformed(String),

    /// Authentication failed: wrong key or altered ciphertext.
    #[error("decryption failed: wrong key or tampered data")]
    Decryption,

    #[error("decrypted text is not UTF-8")]
    InvalidUtf8,
}
