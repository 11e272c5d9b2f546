use std::io::{Cursor, Write};

use datamap_cli::{Mode, derive_key, load_map, process, read_rows, resolve_key};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::NamedTempFile;

const USERS_MAP: &str = r#"{
    "fields": [
        { "property": "username", "type": "text" },
        { "property": "active", "type": "boolean" },
        { "property": "created", "type": "date_time", "format": "Y-m-d H:i:s" }
    ]
}"#;

const SECRETS_MAP: &str = r#"{
    "fields": [
        { "property": "note", "type": "text_encrypt" }
    ]
}"#;

const SALT: &str = "000102030405060708090a0b0c0d0e0f";

fn write_map(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

// ── Input ────────────────────────────────────────────────────────

#[test]
fn reads_array_or_single_object() {
    let rows = read_rows(Cursor::new(r#"[{"a":1},{"b":2}]"#)).unwrap();
    assert_eq!(rows.len(), 2);

    let rows = read_rows(Cursor::new(r#"{"a":1}"#)).unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn rejects_non_object_rows() {
    assert!(read_rows(Cursor::new("[1, 2]")).is_err());
    assert!(read_rows(Cursor::new("\"text\"")).is_err());
    assert!(read_rows(Cursor::new("not json")).is_err());
}

// ── Map loading ──────────────────────────────────────────────────

#[test]
fn missing_map_file_is_an_error() {
    let err = load_map(std::path::Path::new("/nonexistent/map.json"), None, false).unwrap_err();
    assert!(err.to_string().contains("failed to read map"));
}

#[test]
fn encrypted_map_needs_key() {
    let file = write_map(SECRETS_MAP);
    assert!(load_map(file.path(), None, false).is_err());

    let key = derive_key("correct horse", SALT).unwrap();
    assert!(load_map(file.path(), Some(key), false).is_ok());
}

#[test]
fn bad_salt_is_rejected() {
    assert!(derive_key("pass", "zz").is_err());
}

#[test]
fn passphrase_alone_is_ignored() {
    // DATAMAP_KEY may sit in the environment for maps without encrypted fields
    assert!(resolve_key(Some("pw"), None).unwrap().is_none());
    assert!(resolve_key(None, None).unwrap().is_none());
    assert!(resolve_key(None, Some(SALT)).is_err());

    assert!(resolve_key(Some("pw"), Some(SALT)).unwrap().is_some());
}

// ── Processing ───────────────────────────────────────────────────

#[test]
fn import_prints_typed_records() {
    let file = write_map(USERS_MAP);
    let map = load_map(file.path(), None, false).unwrap();
    let rows = read_rows(Cursor::new(
        r#"[{"username":"bob","active":"yes","created":"2024-01-15 10:00:00"}]"#,
    ))
    .unwrap();

    let outcome = process(&map, &rows, Mode::Import).unwrap();
    assert_eq!(outcome.warnings, 0);
    assert_eq!(
        outcome.rows[0],
        json!({
            "active": {"bool": true},
            "created": {"date_time": "2024-01-15T10:00:00"},
            "username": {"text": "bob"}
        })
    );
}

#[test]
fn roundtrip_canonicalizes() {
    let file = write_map(USERS_MAP);
    let map = load_map(file.path(), None, false).unwrap();
    let rows = read_rows(Cursor::new(
        r#"[{"username":"bob","active":"yes","created":"2024-01-15 10:00:00"}]"#,
    ))
    .unwrap();

    let outcome = process(&map, &rows, Mode::Roundtrip).unwrap();
    assert_eq!(
        outcome.rows,
        vec![json!({"username": "bob", "active": "1", "created": "2024-01-15 10:00:00"})]
    );
}

#[test]
fn warnings_are_counted() {
    let file = write_map(USERS_MAP);
    let map = load_map(file.path(), None, false).unwrap();
    let rows = read_rows(Cursor::new(r#"[{"created":"garbage"},{"created":"also bad"}]"#)).unwrap();

    let outcome = process(&map, &rows, Mode::Import).unwrap();
    assert_eq!(outcome.warnings, 2);
    assert_eq!(outcome.rows.len(), 2);
}

#[test]
fn strict_rejects_unknown_columns() {
    let file = write_map(USERS_MAP);
    let rows = read_rows(Cursor::new(r#"[{"username":"bob","extra":1}]"#)).unwrap();

    let lenient = load_map(file.path(), None, false).unwrap();
    assert!(process(&lenient, &rows, Mode::Import).is_ok());

    let strict = load_map(file.path(), None, true).unwrap();
    let err = process(&strict, &rows, Mode::Import).unwrap_err();
    assert!(format!("{err:#}").contains("extra"));
}

#[test]
fn encrypted_roundtrip_with_same_passphrase() {
    let file = write_map(SECRETS_MAP);
    let writer = load_map(file.path(), Some(derive_key("pw", SALT).unwrap()), false).unwrap();
    let reader = load_map(file.path(), Some(derive_key("pw", SALT).unwrap()), false).unwrap();

    let rows = read_rows(Cursor::new(r#"[{"note":"meet at noon"}]"#)).unwrap();
    // plaintext input fails to decrypt and passes through with a warning
    let sealed = process(&writer, &rows, Mode::Roundtrip).unwrap();
    assert_eq!(sealed.warnings, 1);

    let sealed_rows = read_rows(Cursor::new(serde_json::to_string(&sealed.rows).unwrap())).unwrap();
    assert_ne!(sealed_rows[0]["note"], json!("meet at noon"));

    let opened = process(&reader, &sealed_rows, Mode::Import).unwrap();
    assert_eq!(opened.warnings, 0);
    assert_eq!(opened.rows[0], json!({"note": {"text": "meet at noon"}}));
}
