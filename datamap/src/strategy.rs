//! The per-field strategy contract.

use crate::entity::Fields;
use datamap_types::{Access, FieldValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// A storage-side record: column name → raw value.
pub type Row = serde_json::Map<String, Value>;

/// Outcome of a storage → domain conversion.
pub type Conversion = Result<FieldValue, ConversionWarning>;

/// Outcome of a domain → storage conversion.
pub type Encoded = Result<Value, ConversionWarning>;

/// Tag marking the field that identifies a record.
pub const PRIMARY_KEY_TAG: &str = "primary key";

/// The storage shape a strategy targets.
///
/// The same logical type is written differently to a database row, an HTML
/// form and a display table (e.g. booleans as `"1"` vs `"Yes"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    #[default]
    Db,
    Form,
    Table,
}

/// The concrete strategy family, also the `type` key of a field config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Boolean,
    Integer,
    Decimal,
    DateTime,
    Date,
    Time,
    Year,
    Json,
    Money,
    Serial,
    TextEncrypt,
    Array,
}

/// Identity and access policy shared by every strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Name of the entity property.
    pub property: String,
    /// Name of the storage column; defaults to `property`.
    pub column: String,
    pub access: Access,
    pub tags: BTreeSet<String>,
}

impl FieldDef {
    pub fn new(property: impl Into<String>) -> Self {
        let property = property.into();
        Self {
            column: property.clone(),
            property,
            access: Access::READ_WRITE,
            tags: BTreeSet::new(),
        }
    }

    /// Builds a storage → domain warning for this field.
    pub fn warn_property(
        &self,
        kind: WarningKind,
        message: impl Into<String>,
        fallback: FieldValue,
    ) -> ConversionWarning {
        ConversionWarning {
            property: self.property.clone(),
            column: self.column.clone(),
            kind,
            message: message.into(),
            fallback: WarningFallback::Property(fallback),
        }
    }

    /// Builds a domain → storage warning for this field.
    pub fn warn_column(
        &self,
        kind: WarningKind,
        message: impl Into<String>,
        fallback: Value,
    ) -> ConversionWarning {
        ConversionWarning {
            property: self.property.clone(),
            column: self.column.clone(),
            kind,
            message: message.into(),
            fallback: WarningFallback::Column(fallback),
        }
    }

    /// Warning for a domain value of a type this field cannot encode.
    ///
    /// The value's plain rendering is passed through unchanged.
    pub fn mismatch(&self, expected: &str, found: &FieldValue) -> ConversionWarning {
        self.warn_column(
            WarningKind::TypeMismatch,
            format!("expected {expected}, found {}", found.type_name()),
            found.to_plain(),
        )
    }

    /// Warning for a raw value of a shape this field cannot decode.
    pub fn raw_mismatch(&self, expected: &str, found: &Value) -> ConversionWarning {
        self.warn_property(
            WarningKind::TypeMismatch,
            format!("expected {expected}, found {}", raw_type_name(found)),
            FieldValue::from_raw(found),
        )
    }
}

pub(crate) fn raw_type_name(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Category of a conversion problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Input could not be parsed (bad JSON, unparseable date, "12abc").
    Malformed,
    /// Numeric input outside the representable range.
    OutOfRange,
    /// Value of the wrong type for this field.
    TypeMismatch,
    /// Encrypted text could not be decrypted.
    Decrypt,
    /// Text could not be encrypted.
    Encrypt,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Malformed => "malformed",
            Self::OutOfRange => "out of range",
            Self::TypeMismatch => "type mismatch",
            Self::Decrypt => "decrypt failed",
            Self::Encrypt => "encrypt failed",
        })
    }
}

/// Which way a conversion was running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Storage → domain.
    ToProperty,
    /// Domain → storage.
    ToColumn,
}

/// The best-effort value a failed conversion settled on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningFallback {
    Property(FieldValue),
    Column(Value),
}

/// A non-fatal problem converting one field.
///
/// Bulk operations assign `fallback` and keep going; the warning is handed
/// back so callers can decide whether to reject the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{property} ({column}): {kind}: {message}")]
pub struct ConversionWarning {
    pub property: String,
    pub column: String,
    pub kind: WarningKind,
    pub message: String,
    pub fallback: WarningFallback,
}

impl ConversionWarning {
    #[must_use]
    pub fn direction(&self) -> Direction {
        match self.fallback {
            WarningFallback::Property(_) => Direction::ToProperty,
            WarningFallback::Column(_) => Direction::ToColumn,
        }
    }

    /// The domain fallback, or `Null` for a storage-side warning.
    #[must_use]
    pub fn fallback_property(&self) -> FieldValue {
        match &self.fallback {
            WarningFallback::Property(v) => v.clone(),
            WarningFallback::Column(_) => FieldValue::Null,
        }
    }

    /// The storage fallback, or `null` for a domain-side warning.
    #[must_use]
    pub fn fallback_column(&self) -> Value {
        match &self.fallback {
            WarningFallback::Column(v) => v.clone(),
            WarningFallback::Property(_) => Value::Null,
        }
    }
}

/// One field's bidirectional conversion rule and access policy.
///
/// Implementors supply [`decode`](FieldStrategy::decode) and
/// [`encode`](FieldStrategy::encode) for non-null values; null handling,
/// key lookup and access checks are provided.
pub trait FieldStrategy: fmt::Debug + Send + Sync {
    fn def(&self) -> &FieldDef;

    fn def_mut(&mut self) -> &mut FieldDef;

    fn kind(&self) -> FieldKind;

    /// Converts a non-null raw value to its domain form.
    fn decode(&self, raw: &Value) -> Conversion;

    /// Converts a non-null domain value to its storage form.
    fn encode(&self, value: &FieldValue) -> Encoded;

    /// Domain value for a null column.
    fn null_property(&self) -> FieldValue {
        FieldValue::Null
    }

    /// Storage value for a null property.
    fn null_column(&self) -> Value {
        Value::Null
    }

    fn property(&self) -> &str {
        &self.def().property
    }

    fn column(&self) -> &str {
        &self.def().column
    }

    fn access(&self) -> Access {
        self.def().access
    }

    fn has_access(&self, flag: Access) -> bool {
        self.def().access.intersects(flag)
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.def().tags.contains(tag)
    }

    fn is_primary_key(&self) -> bool {
        self.has_tag(PRIMARY_KEY_TAG)
    }

    /// Decodes a raw value, routing null to [`null_property`](FieldStrategy::null_property).
    fn property_from_raw(&self, raw: &Value) -> Conversion {
        if raw.is_null() {
            Ok(self.null_property())
        } else {
            self.decode(raw)
        }
    }

    /// Encodes a domain value, routing null to [`null_column`](FieldStrategy::null_column).
    fn column_from_value(&self, value: &FieldValue) -> Encoded {
        if value.is_null() {
            Ok(self.null_column())
        } else {
            self.encode(value)
        }
    }

    /// Reads this field's column out of `row`; `None` when the key is absent.
    fn to_property(&self, row: &Row) -> Option<Conversion> {
        row.get(self.column()).map(|raw| self.property_from_raw(raw))
    }

    /// Reads this field's property off `entity`; `None` when the entity
    /// does not expose it.
    fn to_column(&self, entity: &dyn Fields) -> Option<Encoded> {
        entity
            .get_field(self.property())
            .map(|value| self.column_from_value(&value))
    }

    fn with_column(mut self, column: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.def_mut().column = column.into();
        self
    }

    fn with_access(mut self, access: Access) -> Self
    where
        Self: Sized,
    {
        self.def_mut().access = access;
        self
    }

    fn with_tag(mut self, tag: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.def_mut().tags.insert(tag.into());
        self
    }

    fn primary_key(self) -> Self
    where
        Self: Sized,
    {
        self.with_tag(PRIMARY_KEY_TAG)
    }
}
