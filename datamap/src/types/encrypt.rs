//! Encrypted text fields.

use crate::strategy::{
    Conversion, Encoded, FieldDef, FieldKind, FieldStrategy, WarningKind, raw_type_name,
};
use datamap_crypto::{TextKey, decrypt_text, encrypt_text};
use datamap_types::FieldValue;
use serde_json::Value;
use std::sync::Arc;

/// A text field encrypted at rest.
///
/// The key is supplied per strategy. Text that fails to decrypt (legacy
/// plaintext, rotated keys) is passed through as-is with a `Decrypt`
/// warning. Empty strings are stored unencrypted.
#[derive(Debug, Clone)]
pub struct TextEncrypt {
    def: FieldDef,
    key: Arc<TextKey>,
}

impl TextEncrypt {
    pub fn new(property: impl Into<String>, key: Arc<TextKey>) -> Self {
        Self {
            def: FieldDef::new(property),
            key,
        }
    }
}

impl FieldStrategy for TextEncrypt {
    fn def(&self) -> &FieldDef {
        &self.def
    }

    fn def_mut(&mut self) -> &mut FieldDef {
        &mut self.def
    }

    fn kind(&self) -> FieldKind {
        FieldKind::TextEncrypt
    }

    fn decode(&self, raw: &Value) -> Conversion {
        let Value::String(sealed) = raw else {
            return Err(self.def.warn_property(
                WarningKind::TypeMismatch,
                format!("{} in an encrypted column", raw_type_name(raw)),
                FieldValue::from_raw(raw),
            ));
        };
        if sealed.is_empty() {
            return Ok(FieldValue::Text(String::new()));
        }

        decrypt_text(&self.key, sealed)
            .map(FieldValue::Text)
            .map_err(|e| {
                self.def
                    .warn_property(WarningKind::Decrypt, e.to_string(), FieldValue::Text(sealed.clone()))
            })
    }

    fn encode(&self, value: &FieldValue) -> Encoded {
        let plaintext = match value {
            FieldValue::Json(_) => return Err(self.def.mismatch("text", value)),
            other => other.to_text().unwrap_or_default(),
        };
        if plaintext.is_empty() {
            return Ok(Value::String(plaintext));
        }

        encrypt_text(&self.key, &plaintext)
            .map(Value::String)
            .map_err(|e| self.def.warn_column(WarningKind::Encrypt, e.to_string(), Value::Null))
    }
}
