//! Delimited list fields.

use crate::strategy::{Conversion, Encoded, FieldDef, FieldKind, FieldStrategy};
use datamap_types::FieldValue;
use serde_json::Value;

/// An ordered list of strings stored as one delimited string (`"a,b,c"`).
#[derive(Debug, Clone)]
pub struct ArrayType {
    def: FieldDef,
    separator: String,
}

impl ArrayType {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            def: FieldDef::new(property),
            separator: ",".to_string(),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        if !separator.is_empty() {
            self.separator = separator;
        }
        self
    }

    fn item_text(item: &Value) -> String {
        match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl FieldStrategy for ArrayType {
    fn def(&self) -> &FieldDef {
        &self.def
    }

    fn def_mut(&mut self) -> &mut FieldDef {
        &mut self.def
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Array
    }

    fn decode(&self, raw: &Value) -> Conversion {
        let items = match raw {
            Value::String(s) if s.is_empty() => Vec::new(),
            Value::String(s) => s.split(self.separator.as_str()).map(str::to_string).collect(),
            Value::Array(items) => items.iter().map(Self::item_text).collect(),
            other => vec![Self::item_text(other)],
        };
        Ok(FieldValue::List(items))
    }

    fn encode(&self, value: &FieldValue) -> Encoded {
        if let Some(items) = value.as_list() {
            return Ok(Value::String(items.join(&self.separator)));
        }
        let joined = match value {
            FieldValue::Json(Value::Array(items)) => items
                .iter()
                .map(Self::item_text)
                .collect::<Vec<_>>()
                .join(&self.separator),
            FieldValue::Json(_) => return Err(self.def.mismatch("list", value)),
            other => other.to_text().unwrap_or_default(),
        };
        Ok(Value::String(joined))
    }
}
