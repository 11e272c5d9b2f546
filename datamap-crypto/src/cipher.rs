//! ChaCha20-Poly1305 sealing of field text.

use crate::error::{CryptoError, CryptoResult};
use crate::key::TextKey;
use base64::{Engine, engine::general_purpose::STANDARD};
use chacha20poly1305::{
    ChaCha20Poly1305, Nonce,
    aead::{Aead, KeyInit},
};
use rand::RngCore;

/// Size of nonce in bytes (96 bits for ChaCha20-Poly1305).
pub const NONCE_SIZE: usize = 12;

/// Size of authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Encrypts `plaintext`, returning `base64(nonce || ciphertext || tag)`.
///
/// A fresh random nonce is drawn per call, so equal plaintexts produce
/// different column values.
pub fn encrypt_text(key: &TextKey, plaintext: &str) -> CryptoResult<String> {
    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);

    let sealed = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    let mut out = Vec::with_capacity(NONCE_SIZE + sealed.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&sealed);
    Ok(STANDARD.encode(out))
}

/// Decrypts a value produced by [`encrypt_text`].
pub fn decrypt_text(key: &TextKey, encoded: &str) -> CryptoResult<String> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| CryptoError::Malformed(format!("invalid base64: {e}")))?;

    if bytes.len() < NONCE_SIZE + TAG_SIZE {
        return Err(CryptoError::Malformed(format!("{} bytes is too short", bytes.len())));
    }

    let (nonce, sealed) = bytes.split_at(NONCE_SIZE);
    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| CryptoError::Decryption)?;

    String::from_utf8(plaintext).map_err(|_| CryptoError::InvalidUtf8)
}
