//! Typed domain values.

use crate::{Error, Money, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A typed value on the domain side of a mapping.
///
/// Storage values are raw `serde_json::Value`s; field strategies turn those
/// into `FieldValue`s and back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Decimal(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    Year(i32),
    Money(Money),
    List(Vec<String>),
    Json(serde_json::Value),
}

impl FieldValue {
    /// Lifts an untyped storage value without any field knowledge.
    ///
    /// Used for passthrough columns that no strategy is registered for.
    #[must_use]
    pub fn from_raw(raw: &serde_json::Value) -> Self {
        use serde_json::Value;

        match raw {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Decimal(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => Self::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => Self::Json(raw.clone()),
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the variant, used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Decimal(_) => "decimal",
            Self::Text(_) => "text",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::Time(_) => "time",
            Self::Year(_) => "year",
            Self::Money(_) => "money",
            Self::List(_) => "list",
            Self::Json(_) => "json",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Decimal(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_money(&self) -> Option<&Money> {
        match self {
            Self::Money(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Untyped storage rendering, the loose inverse of [`FieldValue::from_raw`].
    ///
    /// Dates use ISO-style formats, money collapses to its minor units and
    /// lists to a comma-joined string.
    #[must_use]
    pub fn to_plain(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::Decimal(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Self::Year(y) => Value::from(*y),
            Self::Money(m) => Value::from(m.amount()),
            Self::Json(v) => v.clone(),
            Self::Text(_) | Self::Date(_) | Self::DateTime(_) | Self::Time(_) | Self::List(_) => {
                self.to_text().map_or(Value::Null, Value::String)
            }
        }
    }

    /// Scalar string rendering; `None` only for `Null`.
    ///
    /// Booleans render as `"1"` and `""` to match form and SQL conventions.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        Some(match self {
            Self::Null => return None,
            Self::Bool(true) => "1".to_string(),
            Self::Bool(false) => String::new(),
            Self::Int(i) => i.to_string(),
            Self::Decimal(f) => f.to_string(),
            Self::Text(s) => s.clone(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            Self::Time(t) => t.format("%H:%M:%S").to_string(),
            Self::Year(y) => y.to_string(),
            Self::Money(m) => m.to_decimal_string(),
            Self::List(items) => items.join(","),
            Self::Json(v) => v.to_string(),
        })
    }

    fn mismatch(expected: &'static str, found: &FieldValue) -> Error {
        Error::TypeMismatch {
            expected,
            found: found.type_name(),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i64 => Int,
    i32 => Int,
    u32 => Int,
    f64 => Decimal,
    String => Text,
    &str => Text,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    NaiveTime => Time,
    Money => Money,
    Vec<String> => List,
    serde_json::Value => Json,
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Conversion out of a [`FieldValue`] into a concrete Rust type.
///
/// Implemented for the types a mapped struct field is likely to have;
/// `Option<T>` maps `Null` to `None`.
pub trait FromFieldValue: Sized {
    fn from_field_value(value: FieldValue) -> Result<Self>;
}

impl FromFieldValue for FieldValue {
    fn from_field_value(value: FieldValue) -> Result<Self> {
        Ok(value)
    }
}

impl<T: FromFieldValue> FromFieldValue for Option<T> {
    fn from_field_value(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Null => Ok(None),
            other => T::from_field_value(other).map(Some),
        }
    }
}

impl FromFieldValue for bool {
    fn from_field_value(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Bool(b) => Ok(b),
            other => Err(FieldValue::mismatch("bool", &other)),
        }
    }
}

impl FromFieldValue for i64 {
    fn from_field_value(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Int(i) => Ok(i),
            FieldValue::Year(y) => Ok(i64::from(y)),
            other => Err(FieldValue::mismatch("int", &other)),
        }
    }
}

impl FromFieldValue for i32 {
    fn from_field_value(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Year(y) => Ok(y),
            FieldValue::Int(i) => {
                i32::try_from(i).map_err(|_| FieldValue::mismatch("i32", &FieldValue::Int(i)))
            }
            other => Err(FieldValue::mismatch("i32", &other)),
        }
    }
}

impl FromFieldValue for f64 {
    fn from_field_value(value: FieldValue) -> Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| FieldValue::mismatch("decimal", &value))
    }
}

impl FromFieldValue for String {
    fn from_field_value(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Text(s) => Ok(s),
            other => Err(FieldValue::mismatch("text", &other)),
        }
    }
}

impl FromFieldValue for NaiveDate {
    fn from_field_value(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Date(d) => Ok(d),
            FieldValue::DateTime(dt) => Ok(dt.date()),
            other => Err(FieldValue::mismatch("date", &other)),
        }
    }
}

impl FromFieldValue for NaiveDateTime {
    fn from_field_value(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::DateTime(dt) => Ok(dt),
            FieldValue::Date(d) => Ok(d.and_time(NaiveTime::MIN)),
            other => Err(FieldValue::mismatch("datetime", &other)),
        }
    }
}

impl FromFieldValue for NaiveTime {
    fn from_field_value(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Time(t) => Ok(t),
            FieldValue::DateTime(dt) => Ok(dt.time()),
            other => Err(FieldValue::mismatch("time", &other)),
        }
    }
}

impl FromFieldValue for Money {
    fn from_field_value(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Money(m) => Ok(m),
            other => Err(FieldValue::mismatch("money", &other)),
        }
    }
}

impl FromFieldValue for Vec<String> {
    fn from_field_value(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::List(items) => Ok(items),
            other => Err(FieldValue::mismatch("list", &other)),
        }
    }
}

impl FromFieldValue for serde_json::Value {
    fn from_field_value(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Json(v) => Ok(v),
            FieldValue::Null => Ok(serde_json::Value::Null),
            other => Err(FieldValue::mismatch("json", &other)),
        }
    }
}
