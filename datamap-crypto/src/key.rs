//! Field encryption keys.
//!
//! A [`TextKey`] is either random, loaded from raw bytes, or derived from an
//! operator passphrase with Argon2id.

use crate::error::{CryptoError, CryptoResult};
use argon2::{Argon2, Params, Version};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of field keys in bytes (256 bits for ChaCha20).
pub const KEY_SIZE: usize = 32;

/// Size of a derivation salt in bytes.
pub const SALT_SIZE: usize = 16;

/// A symmetric key for encrypted text fields, zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct TextKey {
    bytes: [u8; KEY_SIZE],
}

impl TextKey {
    /// Wraps raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Copies key bytes out of a slice of unchecked length.
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let array: [u8; KEY_SIZE] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: KEY_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self::from_bytes(array))
    }

    /// Generates a fresh random key.
    pub fn random() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Derives a key from a passphrase using Argon2id.
    ///
    /// The same passphrase, salt and params always yield the same key, so a
    /// deployment only has to persist the salt alongside its configuration.
    pub fn derive(passphrase: &str, salt: &Salt, params: &KdfParams) -> CryptoResult<Self> {
        let argon2_params = Params::new(
            params.memory_cost,
            params.time_cost,
            params.parallelism,
            Some(KEY_SIZE),
        )
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;

        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, argon2_params);

        let mut bytes = [0u8; KEY_SIZE];
        argon2
            .hash_password_into(passphrase.as_bytes(), salt.as_bytes(), &mut bytes)
            .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;

        Ok(Self { bytes })
    }

    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for TextKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Salt for passphrase derivation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Salt {
    bytes: [u8; SALT_SIZE],
}

impl Salt {
    /// Generates a random salt.
    pub fn random() -> Self {
        let mut bytes = [0u8; SALT_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self { bytes }
    }

    /// Parses a salt from 32 hex digits.
    pub fn from_hex(hex: &str) -> CryptoResult<Self> {
        let hex = hex.trim();
        if hex.len() != SALT_SIZE * 2 || !hex.is_ascii() {
            return Err(CryptoError::InvalidSalt(format!(
                "salt must be {} hex digits",
                SALT_SIZE * 2
            )));
        }

        let mut bytes = [0u8; SALT_SIZE];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|e| CryptoError::InvalidSalt(e.to_string()))?;
        }
        Ok(Self { bytes })
    }

    /// Lowercase hex rendering, the inverse of [`Salt::from_hex`].
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.bytes
    }
}

/// Argon2id cost parameters.
#[derive(Clone, Debug)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    /// Time cost (iterations).
    pub time_cost: u32,
    /// Parallelism factor.
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        // OWASP minimums for Argon2id
        Self {
            memory_cost: 19 * 1024,
            time_cost: 2,
            parallelism: 1,
        }
    }
}
