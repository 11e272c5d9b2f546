//! JSON document fields.

use crate::strategy::{Conversion, Encoded, FieldDef, FieldKind, FieldStrategy, WarningKind};
use datamap_types::FieldValue;
use serde_json::Value;

/// A field stored as JSON text.
///
/// With `associative` set the field holds key/value collections, and an
/// empty collection is written as `""` rather than `[]`/`{}`; an empty
/// column reads back as null. Invalid JSON keeps the raw text.
#[derive(Debug, Clone)]
pub struct Json {
    def: FieldDef,
    associative: bool,
}

impl Json {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            def: FieldDef::new(property),
            associative: false,
        }
    }

    pub fn associative(mut self, associative: bool) -> Self {
        self.associative = associative;
        self
    }

    fn is_empty_collection(value: &Value) -> bool {
        match value {
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }
}

impl FieldStrategy for Json {
    fn def(&self) -> &FieldDef {
        &self.def
    }

    fn def_mut(&mut self) -> &mut FieldDef {
        &mut self.def
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Json
    }

    fn decode(&self, raw: &Value) -> Conversion {
        let Value::String(text) = raw else {
            return Ok(FieldValue::Json(raw.clone()));
        };
        if text.trim().is_empty() {
            return Ok(FieldValue::Null);
        }

        match serde_json::from_str::<Value>(text) {
            Ok(Value::Null) => Ok(FieldValue::Null),
            Ok(value) => Ok(FieldValue::Json(value)),
            Err(e) => Err(self.def.warn_property(
                WarningKind::Malformed,
                format!("invalid JSON: {e}"),
                FieldValue::Text(text.clone()),
            )),
        }
    }

    fn encode(&self, value: &FieldValue) -> Encoded {
        let doc = match value {
            FieldValue::Json(v) => v.clone(),
            FieldValue::List(items) => Value::from(items.clone()),
            other => other.to_plain(),
        };
        if doc.is_null() {
            return Ok(Value::Null);
        }
        if self.associative && Self::is_empty_collection(&doc) {
            return Ok(Value::String(String::new()));
        }
        Ok(Value::String(doc.to_string()))
    }
}
