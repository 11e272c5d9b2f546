use datamap_crypto::{CryptoError, KdfParams, Salt, TextKey, KEY_SIZE};

fn test_params() -> KdfParams {
    KdfParams {
        memory_cost: 1024,
        time_cost: 1,
        parallelism: 1,
    }
}

// ── derive ───────────────────────────────────────────────────────

#[test]
fn derive_is_deterministic() {
    let salt = Salt::from_bytes([7; 16]);
    let a = TextKey::derive("correct horse", &salt, &test_params()).unwrap();
    let b = TextKey::derive("correct horse", &salt, &test_params()).unwrap();
    assert_eq!(a.as_bytes(), b.as_bytes());
}

#[test]
fn different_passphrases_produce_different_keys() {
    let salt = Salt::from_bytes([7; 16]);
    let a = TextKey::derive("one", &salt, &test_params()).unwrap();
    let b = TextKey::derive("two", &salt, &test_params()).unwrap();
    assert_ne!(a.as_bytes(), b.as_bytes());
}

#[test]
fn different_salts_produce_different_keys() {
    let a = TextKey::derive("same", &Salt::from_bytes([1; 16]), &test_params()).unwrap();
    let b = TextKey::derive("same", &Salt::from_bytes([2; 16]), &test_params()).unwrap();
    assert_ne!(a.as_bytes(), b.as_bytes());
}

#[test]
fn invalid_params_fail_derivation() {
    let params = KdfParams {
        memory_cost: 1,
        time_cost: 0,
        parallelism: 0,
    };
    let err = TextKey::derive("pw", &Salt::from_bytes([0; 16]), &params).unwrap_err();
    assert!(matches!(err, CryptoError::KeyDerivation(_)));
}

// ── construction ─────────────────────────────────────────────────

#[test]
fn random_keys_differ() {
    assert_ne!(TextKey::random().as_bytes(), TextKey::random().as_bytes());
}

#[test]
fn from_slice_checks_length() {
    assert!(TextKey::from_slice(&[0u8; KEY_SIZE]).is_ok());
    let err = TextKey::from_slice(&[0u8; 16]).unwrap_err();
    assert!(matches!(
        err,
        CryptoError::InvalidKeyLength {
            expected: 32,
            actual: 16
        }
    ));
}

#[test]
fn debug_redacts_key_bytes() {
    let key = TextKey::from_bytes([0xAB; KEY_SIZE]);
    let dbg = format!("{key:?}");
    assert!(dbg.contains("REDACTED"));
    assert!(!dbg.contains("171"));
}

// ── Salt ─────────────────────────────────────────────────────────

#[test]
fn salt_hex_roundtrip() {
    let salt = Salt::from_bytes([0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 255]);
    assert_eq!(salt.to_hex(), "000102030405060708090a0b0c0d0eff");
    assert_eq!(Salt::from_hex(&salt.to_hex()).unwrap(), salt);
}

#[test]
fn salt_from_hex_rejects_bad_input() {
    assert!(matches!(Salt::from_hex("abcd"), Err(CryptoError::InvalidSalt(_))));
    assert!(Salt::from_hex("zz0102030405060708090a0b0c0d0eff").is_err());
}

#[test]
fn random_salts_differ() {
    assert_ne!(Salt::random(), Salt::random());
}
