//! Plain text fields.

use crate::strategy::{Conversion, Encoded, FieldDef, FieldKind, FieldStrategy, WarningKind};
use datamap_types::FieldValue;
use serde_json::Value;

/// A string field.
///
/// Null becomes the empty string in both directions unless the field is
/// nullable.
#[derive(Debug, Clone)]
pub struct Text {
    def: FieldDef,
    nullable: bool,
}

impl Text {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            def: FieldDef::new(property),
            nullable: false,
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

impl FieldStrategy for Text {
    fn def(&self) -> &FieldDef {
        &self.def
    }

    fn def_mut(&mut self) -> &mut FieldDef {
        &mut self.def
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Text
    }

    fn decode(&self, raw: &Value) -> Conversion {
        match raw {
            Value::String(s) => Ok(FieldValue::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => Err(self.def.warn_property(
                WarningKind::TypeMismatch,
                "structured value in a text column",
                FieldValue::Text(raw.to_string()),
            )),
            scalar => Ok(FieldValue::Text(
                FieldValue::from_raw(scalar).to_text().unwrap_or_default(),
            )),
        }
    }

    fn encode(&self, value: &FieldValue) -> Encoded {
        match value {
            FieldValue::Json(_) => Err(self.def.mismatch("text", value)),
            other => Ok(Value::String(other.to_text().unwrap_or_default())),
        }
    }

    fn null_property(&self) -> FieldValue {
        if self.nullable {
            FieldValue::Null
        } else {
            FieldValue::Text(String::new())
        }
    }

    fn null_column(&self) -> Value {
        if self.nullable {
            Value::Null
        } else {
            Value::String(String::new())
        }
    }
}
