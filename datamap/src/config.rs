//! Declarative map definitions.
//!
//! A [`MapConfig`] describes a [`DataMap`] as data, so entity shapes can live
//! in JSON next to the schema they mirror:
//!
//! ```json
//! { "unmapped": "collect",
//!   "fields": [
//!     { "property": "id", "type": "integer", "tags": ["primary key"] },
//!     { "property": "created", "column": "created_at", "type": "date_time" },
//!     { "property": "price", "type": "money", "currency": "AUD", "dialect": "form" } ] }
//! ```

use crate::error::{MapError, MapResult};
use crate::map::{DataMap, UnmappedPolicy};
use crate::strategy::{Dialect, FieldKind, FieldStrategy};
use crate::types::{
    ArrayType, Boolean, Date, DateTime, Decimal, Integer, Json, MoneyType, Serial, Text,
    TextEncrypt, Time, Year,
};
use datamap_crypto::TextKey;
use datamap_types::{Access, Currency};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A complete map definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default)]
    pub unmapped: UnmappedPolicy,
    pub fields: Vec<FieldConfig>,
}

/// One field of a [`MapConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub property: String,
    /// Storage column; defaults to `property`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default = "default_access")]
    pub access: Access,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub dialect: Dialect,
    /// Date format (PHP tokens or strftime) for temporal types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Null handling for text and temporal types. Unset keeps the type's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    /// ISO currency code, required for `money`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Empty collections stored as `""` for `json`.
    #[serde(default)]
    pub associative: bool,
    /// List separator for `array`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
}

fn default_access() -> Access {
    Access::READ_WRITE
}

/// Runtime resources some field types need at build time.
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    /// Key for `text_encrypt` fields.
    pub text_key: Option<Arc<TextKey>>,
}

impl BuildContext {
    pub fn with_text_key(key: Arc<TextKey>) -> Self {
        Self {
            text_key: Some(key),
        }
    }
}

impl MapConfig {
    pub fn from_json(json: &str) -> MapResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the map, registering fields in declaration order.
    pub fn build(&self, ctx: &BuildContext) -> MapResult<DataMap> {
        let mut map = DataMap::new().with_unmapped(self.unmapped);
        for field in &self.fields {
            map.add_boxed(field.build(ctx)?, None);
        }
        Ok(map)
    }
}

impl FieldConfig {
    pub fn new(property: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            property: property.into(),
            column: None,
            kind,
            access: Access::READ_WRITE,
            tags: Vec::new(),
            dialect: Dialect::Db,
            format: None,
            nullable: None,
            currency: None,
            associative: false,
            separator: None,
        }
    }

    /// Builds the strategy this entry describes.
    pub fn build(&self, ctx: &BuildContext) -> MapResult<Box<dyn FieldStrategy>> {
        if self.property.is_empty() {
            return Err(MapError::Config("field with empty property name".to_string()));
        }

        let property = self.property.as_str();
        let mut strategy: Box<dyn FieldStrategy> = match self.kind {
            FieldKind::Text => Box::new(Text::new(property).nullable(self.nullable.unwrap_or(false))),
            FieldKind::Boolean => Box::new(Boolean::new(property).with_dialect(self.dialect)),
            FieldKind::Integer => Box::new(Integer::new(property)),
            FieldKind::Decimal => Box::new(Decimal::new(property).with_dialect(self.dialect)),
            FieldKind::DateTime => {
                let mut s = DateTime::new(property).nullable(self.nullable.unwrap_or(true));
                if let Some(format) = &self.format {
                    s = s.with_format(format)?;
                }
                Box::new(s)
            }
            FieldKind::Date => {
                let mut s = Date::new(property).nullable(self.nullable.unwrap_or(true));
                if let Some(format) = &self.format {
                    s = s.with_format(format)?;
                }
                Box::new(s)
            }
            FieldKind::Time => {
                let mut s = Time::new(property).nullable(self.nullable.unwrap_or(true));
                if let Some(format) = &self.format {
                    s = s.with_format(format)?;
                }
                Box::new(s)
            }
            FieldKind::Year => Box::new(Year::new(property).nullable(self.nullable.unwrap_or(true))),
            FieldKind::Json => Box::new(Json::new(property).associative(self.associative)),
            FieldKind::Money => {
                let code = self.currency.as_deref().ok_or_else(|| {
                    MapError::Config(format!("money field `{property}` needs a currency"))
                })?;
                Box::new(MoneyType::new(property, Currency::parse(code)?).with_dialect(self.dialect))
            }
            FieldKind::Serial => Box::new(Serial::new(property)),
            FieldKind::TextEncrypt => {
                let key = ctx.text_key.clone().ok_or_else(|| {
                    MapError::Config(format!("encrypted field `{property}` needs a text key"))
                })?;
                Box::new(TextEncrypt::new(property, key))
            }
            FieldKind::Array => {
                let mut s = ArrayType::new(property);
                if let Some(separator) = &self.separator {
                    s = s.with_separator(separator.as_str());
                }
                Box::new(s)
            }
        };

        let def = strategy.def_mut();
        if let Some(column) = &self.column {
            def.column = column.clone();
        }
        def.access = self.access;
        def.tags.extend(self.tags.iter().cloned());
        Ok(strategy)
    }
}
