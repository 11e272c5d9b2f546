use datamap_crypto::{decrypt_text, encrypt_text, CryptoError, TextKey, NONCE_SIZE, TAG_SIZE};

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = TextKey::random();
    let sealed = encrypt_text(&key, "4111 1111 1111 1111").unwrap();
    assert_eq!(decrypt_text(&key, &sealed).unwrap(), "4111 1111 1111 1111");
}

#[test]
fn encrypt_decrypt_empty() {
    let key = TextKey::random();
    let sealed = encrypt_text(&key, "").unwrap();
    assert_eq!(decrypt_text(&key, &sealed).unwrap(), "");
}

#[test]
fn encrypt_decrypt_unicode() {
    let key = TextKey::random();
    let plaintext = "Hello, 世界! 🌍";
    let sealed = encrypt_text(&key, plaintext).unwrap();
    assert_eq!(decrypt_text(&key, &sealed).unwrap(), plaintext);
}

#[test]
fn ciphertext_is_not_plaintext() {
    let key = TextKey::random();
    let sealed = encrypt_text(&key, "secret").unwrap();
    assert!(!sealed.contains("secret"));
}

#[test]
fn same_plaintext_produces_different_ciphertext() {
    let key = TextKey::random();
    let a = encrypt_text(&key, "same").unwrap();
    let b = encrypt_text(&key, "same").unwrap();
    assert_ne!(a, b);
}

#[test]
fn sealed_length_covers_nonce_and_tag() {
    use base64::{Engine, engine::general_purpose::STANDARD};
    let key = TextKey::random();
    let sealed = encrypt_text(&key, "abcd").unwrap();
    let raw = STANDARD.decode(sealed).unwrap();
    assert_eq!(raw.len(), NONCE_SIZE + 4 + TAG_SIZE);
}

#[test]
fn wrong_key_fails_decryption() {
    let k1 = TextKey::random();
    let k2 = TextKey::random();
    let sealed = encrypt_text(&k1, "secret").unwrap();
    assert!(matches!(decrypt_text(&k2, &sealed), Err(CryptoError::Decryption)));
}

#[test]
fn tampered_data_fails_decryption() {
    use base64::{Engine, engine::general_purpose::STANDARD};
    let key = TextKey::random();
    let sealed = encrypt_text(&key, "secret").unwrap();
    let mut raw = STANDARD.decode(sealed).unwrap();
    let last = raw.len() - 1;
    raw[last] ^= 0xFF;
    assert!(decrypt_text(&key, &STANDARD.encode(raw)).is_err());
}

#[test]
fn too_short_input_fails() {
    use base64::{Engine, engine::general_purpose::STANDARD};
    let key = TextKey::random();
    let short = STANDARD.encode([0u8; 10]);
    assert!(matches!(decrypt_text(&key, &short), Err(CryptoError::Malformed(_))));
}

#[test]
fn invalid_base64_fails() {
    let key = TextKey::random();
    let err = decrypt_text(&key, "!!!not-base64!!!").unwrap_err();
    assert!(err.to_string().contains("base64"));
}

#[test]
fn surrounding_whitespace_is_ignored() {
    let key = TextKey::random();
    let sealed = encrypt_text(&key, "padded").unwrap();
    let padded = format!("  {sealed}\n");
    assert_eq!(decrypt_text(&key, &padded).unwrap(), "padded");
}
