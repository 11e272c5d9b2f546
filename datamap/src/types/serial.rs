//! Serialized native values.

use crate::strategy::{
    Conversion, Encoded, FieldDef, FieldKind, FieldStrategy, WarningKind, raw_type_name,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use datamap_types::FieldValue;
use serde_json::Value;

/// A field holding any [`FieldValue`], stored as base64 of its serde JSON
/// form so the variant (date vs text, money vs int) survives the trip.
#[derive(Debug, Clone)]
pub struct Serial {
    def: FieldDef,
}

impl Serial {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            def: FieldDef::new(property),
        }
    }
}

impl FieldStrategy for Serial {
    fn def(&self) -> &FieldDef {
        &self.def
    }

    fn def_mut(&mut self) -> &mut FieldDef {
        &mut self.def
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Serial
    }

    fn decode(&self, raw: &Value) -> Conversion {
        let Value::String(encoded) = raw else {
            return Err(self.def.warn_property(
                WarningKind::TypeMismatch,
                format!("{} in a serialized column", raw_type_name(raw)),
                FieldValue::from_raw(raw),
            ));
        };
        if encoded.trim().is_empty() {
            return Ok(FieldValue::Null);
        }

        let bytes = STANDARD.decode(encoded.trim()).map_err(|e| {
            self.def.warn_property(
                WarningKind::Malformed,
                format!("invalid base64: {e}"),
                FieldValue::Null,
            )
        })?;
        serde_json::from_slice::<FieldValue>(&bytes).map_err(|e| {
            self.def.warn_property(
                WarningKind::Malformed,
                format!("invalid payload: {e}"),
                FieldValue::Null,
            )
        })
    }

    fn encode(&self, value: &FieldValue) -> Encoded {
        let bytes = serde_json::to_vec(value).map_err(|e| {
            self.def.warn_column(
                WarningKind::Malformed,
                format!("cannot serialize: {e}"),
                Value::Null,
            )
        })?;
        Ok(Value::String(STANDARD.encode(bytes)))
    }
}
