//! Bidirectional field mapping for datamap.
//!
//! A [`DataMap`] holds one [`FieldStrategy`] per mapped field and moves data
//! between the storage shape (a [`Row`] of raw JSON values: a SQL row, a form
//! submission, a CSV record) and a typed entity implementing [`Fields`]:
//! - [`DataMap::load_object`]: row → entity, honouring READ access
//! - [`DataMap::load_array`] / [`DataMap::get_array`]: entity → row, honouring WRITE access
//! - [`DataMap::get_primary_key`]: lookup of the field tagged [`PRIMARY_KEY_TAG`]
//!
//! Bulk operations never stop on malformed input. Each strategy reports a
//! [`ConversionWarning`] carrying the best-effort fallback it used, and the
//! caller decides whether warnings are fatal.
//!
//! Maps can be built in code or declared in JSON via [`MapConfig`].

mod config;
mod entity;
mod error;
mod format;
mod map;
mod strategy;
pub mod types;

pub use config::{BuildContext, FieldConfig, MapConfig};
pub use entity::{Fields, Record};
pub use error::{MapError, MapResult};
pub use format::DateFormat;
pub use map::{DataMap, LoadReport, UnmappedPolicy};
pub use strategy::{
    Conversion, ConversionWarning, Dialect, Direction, Encoded, FieldDef, FieldKind,
    FieldStrategy, Row, WarningFallback, WarningKind, PRIMARY_KEY_TAG,
};

pub use datamap_crypto::TextKey;
pub use datamap_types::{Access, Currency, FieldValue, FromFieldValue, Money};
