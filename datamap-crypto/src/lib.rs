//! Text encryption for datamap's encrypted fields.
//!
//! Encrypted columns hold `base64(nonce || ciphertext || tag)` produced by
//! ChaCha20-Poly1305. Keys are passed explicitly to each strategy; there is
//! no process-wide key.

mod cipher;
mod error;
mod key;

pub use cipher::{decrypt_text, encrypt_text, NONCE_SIZE, TAG_SIZE};
pub use error::{CryptoError, CryptoResult};
pub use key::{KdfParams, Salt, TextKey, KEY_SIZE, SALT_SIZE};
