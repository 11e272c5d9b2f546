//! Integer and decimal fields.

use super::numeric_prefix;
use crate::strategy::{
    Conversion, Dialect, Encoded, FieldDef, FieldKind, FieldStrategy, WarningKind, raw_type_name,
};
use datamap_types::FieldValue;
use serde_json::{Number, Value};

/// 2^63. `i64::MAX as f64` rounds up to this, so it is an exclusive bound.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn fits_i64(f: f64) -> bool {
    f.is_finite() && (-I64_BOUND..I64_BOUND).contains(&f)
}

/// An integer field, written back as a decimal string.
///
/// Floats truncate toward zero. Strings with trailing junk ("12abc") keep
/// their numeric prefix and raise a `Malformed` warning; strings with no
/// number at all fall back to 0. A blank string reads as null.
#[derive(Debug, Clone)]
pub struct Integer {
    def: FieldDef,
}

impl Integer {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            def: FieldDef::new(property),
        }
    }

    fn truncate(&self, f: f64) -> Conversion {
        let truncated = f.trunc();
        if fits_i64(truncated) {
            Ok(FieldValue::Int(truncated as i64))
        } else {
            let saturated = if f.is_sign_negative() { i64::MIN } else { i64::MAX };
            Err(self.def.warn_property(
                WarningKind::OutOfRange,
                format!("{f} does not fit in a 64-bit integer"),
                FieldValue::Int(saturated),
            ))
        }
    }

    fn parse_text(&self, s: &str) -> Conversion {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(FieldValue::Null);
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Ok(FieldValue::Int(i));
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return self.truncate(f);
        }

        let fallback = numeric_prefix(trimmed)
            .and_then(|p| p.parse::<f64>().ok())
            .map_or(0, |f| f.trunc() as i64);
        Err(self.def.warn_property(
            WarningKind::Malformed,
            format!("{s:?} is not an integer"),
            FieldValue::Int(fallback),
        ))
    }
}

impl FieldStrategy for Integer {
    fn def(&self) -> &FieldDef {
        &self.def
    }

    fn def_mut(&mut self) -> &mut FieldDef {
        &mut self.def
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Integer
    }

    fn decode(&self, raw: &Value) -> Conversion {
        match raw {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(FieldValue::Int(i)),
                None => self.truncate(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => self.parse_text(s),
            Value::Bool(b) => Ok(FieldValue::Int(i64::from(*b))),
            other => Err(self.def.warn_property(
                WarningKind::TypeMismatch,
                format!("{} in an integer column", raw_type_name(other)),
                FieldValue::Int(0),
            )),
        }
    }

    fn encode(&self, value: &FieldValue) -> Encoded {
        match value {
            FieldValue::Int(i) => Ok(Value::String(i.to_string())),
            FieldValue::Year(y) => Ok(Value::String(y.to_string())),
            FieldValue::Bool(b) => Ok(Value::String(i64::from(*b).to_string())),
            FieldValue::Decimal(f) if f.is_finite() && f.fract() == 0.0 => {
                if fits_i64(*f) {
                    Ok(Value::String((*f as i64).to_string()))
                } else {
                    Err(self.def.warn_column(
                        WarningKind::OutOfRange,
                        format!("{f} does not fit in a 64-bit integer"),
                        value.to_plain(),
                    ))
                }
            }
            other => Err(self.def.mismatch("int", other)),
        }
    }
}

/// A floating point field.
///
/// Databases receive a JSON number; forms and tables a string.
#[derive(Debug, Clone)]
pub struct Decimal {
    def: FieldDef,
    dialect: Dialect,
}

impl Decimal {
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

    fn render(&self, f: f64) -> Encoded {
        match self.dialect {
            Dialect::Db => Number::from_f64(f).map(Value::Number).ok_or_else(|| {
                self.def.warn_column(
                    WarningKind::OutOfRange,
                    format!("{f} has no JSON representation"),
                    Value::Null,
                )
            }),
            Dialect::Form | Dialect::Table => Ok(Value::String(f.to_string())),
        }
    }
}

impl FieldStrategy for Decimal {
    fn def(&self) -> &FieldDef {
        &self.def
    }

    fn def_mut(&mut self) -> &mut FieldDef {
        &mut self.def
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Decimal
    }

    fn decode(&self, raw: &Value) -> Conversion {
        match raw {
            Value::Number(n) => Ok(FieldValue::Decimal(n.as_f64().unwrap_or_default())),
            Value::Bool(b) => Ok(FieldValue::Decimal(if *b { 1.0 } else { 0.0 })),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(FieldValue::Null);
                }
                match trimmed.parse::<f64>() {
                    Ok(f) if f.is_finite() => Ok(FieldValue::Decimal(f)),
                    _ => {
                        let fallback = numeric_prefix(trimmed)
                            .and_then(|p| p.parse::<f64>().ok())
                            .unwrap_or(0.0);
                        Err(self.def.warn_property(
                            WarningKind::Malformed,
                            format!("{s:?} is not a number"),
                            FieldValue::Decimal(fallback),
                        ))
                    }
                }
            }
            other => Err(self.def.raw_mismatch("number", other)),
        }
    }

    fn encode(&self, value: &FieldValue) -> Encoded {
        match value.as_f64() {
            Some(f) => self.render(f),
            None => Err(self.def.mismatch("decimal", value)),
        }
    }
}
