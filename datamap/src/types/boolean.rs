//! Boolean fields.

use crate::strategy::{Conversion, Dialect, Encoded, FieldDef, FieldKind, FieldStrategy};
use datamap_types::FieldValue;
use serde_json::Value;

/// A boolean field.
///
/// Storage → domain accepts many spellings: the column's own name (an HTML
/// checkbox posts its name as its value), `yes`/`true`/`on` in any case, and
/// any non-zero number. Domain → storage always writes one canonical form:
/// `"1"`/`"0"` for databases and forms, `"Yes"`/`"No"` for display tables.
#[derive(Debug, Clone)]
pub struct Boolean {
    def: FieldDef,
    dialect: Dialect,
}

impl Boolean {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            def: FieldDef::new(property),
            dialect: Dialect::Db,
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    fn truthy(&self, raw: &Value) -> bool {
        match raw {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => {
                let s = s.trim();
                s == self.def.column
                    || s.eq_ignore_ascii_case("yes")
                    || s.eq_ignore_ascii_case("true")
                    || s.eq_ignore_ascii_case("on")
                    || s.parse::<f64>().is_ok_and(|f| f.is_finite() && f != 0.0)
            }
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
        }
    }

    fn canonical(&self, b: bool) -> Value {
        let text = match (self.dialect, b) {
            (Dialect::Table, true) => "Yes",
            (Dialect::Table, false) => "No",
            (_, true) => "1",
            (_, false) => "0",
        };
        Value::String(text.to_string())
    }
}

impl FieldStrategy for Boolean {
    fn def(&self) -> &FieldDef {
        &self.def
    }

    fn def_mut(&mut self) -> &mut FieldDef {
        &mut self.def
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Boolean
    }

    fn decode(&self, raw: &Value) -> Conversion {
        Ok(FieldValue::Bool(self.truthy(raw)))
    }

    fn encode(&self, value: &FieldValue) -> Encoded {
        let b = match value {
            FieldValue::Bool(b) => *b,
            FieldValue::Int(_) | FieldValue::Decimal(_) | FieldValue::Text(_) => {
                self.truthy(&value.to_plain())
            }
            other => return Err(self.def.mismatch("bool", other)),
        };
        Ok(self.canonical(b))
    }
}
