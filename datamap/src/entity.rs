//! Named-field access to domain entities.

use datamap_types::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Get/set access to an entity's properties by name.
///
/// This is the only capability a [`DataMap`](crate::DataMap) needs from a
/// domain type. Unknown names must be tolerated: `get_field` returns `None`
/// and `set_field` returns `false` rather than panicking.
pub trait Fields {
    /// Current value of `name`, or `None` if the entity has no such property.
    fn get_field(&self, name: &str) -> Option<FieldValue>;

    /// Assigns `name`. Returns `false` if the property is unknown or the
    /// value does not fit its type.
    fn set_field(&mut self, name: &str, value: FieldValue) -> bool;

    /// Whether the entity stores arbitrary extra properties.
    fn accepts_dynamic(&self) -> bool {
        false
    }
}

/// A dynamic entity: an ordered bag of named values.
///
/// Accepts any property name, so it can receive passthrough columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Renders the record as a plain JSON object (see [`FieldValue::to_plain`]).
    pub fn to_plain_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_plain()))
                .collect(),
        )
    }
}

impl Fields for Record {
    fn get_field(&self, name: &str) -> Option<FieldValue> {
        self.fields.get(name).cloned()
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> bool {
        self.fields.insert(name.to_string(), value);
        true
    }

    fn accepts_dynamic(&self) -> bool {
        true
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Implements [`Fields`] for a plain struct.
///
/// Each listed field must implement `Clone`, `Into<FieldValue>` and
/// [`FromFieldValue`](crate::FromFieldValue); `Option<T>` fields map `Null`
/// to `None`.
///
/// ```ignore
/// struct User { username: String, active: bool, created: Option<NaiveDateTime> }
/// datamap::impl_fields!(User { username, active, created });
/// ```
#[macro_export]
macro_rules! impl_fields {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::Fields for $ty {
            fn get_field(&self, name: &str) -> ::core::option::Option<$crate::FieldValue> {
                match name {
                    $(
                        ::core::stringify!($field) => ::core::option::Option::Some(
                            $crate::FieldValue::from(::core::clone::Clone::clone(&self.$field)),
                        ),
                    )*
                    _ => ::core::option::Option::None,
                }
            }

            fn set_field(&mut self, name: &str, value: $crate::FieldValue) -> bool {
                match name {
                    $(
                        ::core::stringify!($field) => {
                            match $crate::FromFieldValue::from_field_value(value) {
                                ::core::result::Result::Ok(v) => {
                                    self.$field = v;
                                    true
                                }
                                ::core::result::Result::Err(_) => false,
                            }
                        }
                    )*
                    _ => false,
                }
            }
        }
    };
}
