//! The field registry and bulk conversions.

use crate::entity::{Fields, Record};
use crate::error::{MapError, MapResult};
use crate::strategy::{ConversionWarning, FieldStrategy, Row};
use datamap_types::{Access, FieldValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// What a load does with source columns that have no registered strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedPolicy {
    /// Collect them in [`LoadReport::extras`].
    #[default]
    Collect,
    /// Set them on entities that accept dynamic properties; collect otherwise.
    Passthrough,
    /// Fail the load with [`MapError::UnmappedColumn`] before assigning anything.
    Reject,
}

/// Outcome of [`DataMap::load_object`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Number of properties the entity accepted.
    pub assigned: usize,
    /// Conversion problems; each field still received its fallback value.
    pub warnings: Vec<ConversionWarning>,
    /// Unmapped source columns that were not assigned.
    pub extras: Row,
}

impl LoadReport {
    /// True when no conversion produced a warning.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// A registry of field strategies for one entity shape.
///
/// Strategies are indexed by property and by column. Registering a strategy
/// whose property or column is already taken replaces the previous owner in
/// both indexes. Iteration follows registration order.
#[derive(Debug, Clone, Default)]
pub struct DataMap {
    properties: IndexMap<String, Arc<dyn FieldStrategy>>,
    columns: HashMap<String, String>,
    unmapped: UnmappedPolicy,
}

impl DataMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unmapped(mut self, policy: UnmappedPolicy) -> Self {
        self.unmapped = policy;
        self
    }

    pub fn unmapped(&self) -> UnmappedPolicy {
        self.unmapped
    }

    pub fn set_unmapped(&mut self, policy: UnmappedPolicy) {
        self.unmapped = policy;
    }

    /// Registers a strategy, optionally overriding its access flags.
    pub fn add_type<S: FieldStrategy + 'static>(
        &mut self,
        strategy: S,
        access: Option<Access>,
    ) -> Arc<dyn FieldStrategy> {
        self.add_boxed(Box::new(strategy), access)
    }

    /// Registers an already boxed strategy.
    pub fn add_boxed(
        &mut self,
        mut strategy: Box<dyn FieldStrategy>,
        access: Option<Access>,
    ) -> Arc<dyn FieldStrategy> {
        if let Some(access) = access {
            strategy.def_mut().access = access;
        }
        self.insert(Arc::from(strategy))
    }

    /// Builder form of [`add_type`](Self::add_type).
    pub fn with_type<S: FieldStrategy + 'static>(mut self, strategy: S) -> Self {
        self.add_type(strategy, None);
        self
    }

    fn insert(&mut self, strategy: Arc<dyn FieldStrategy>) -> Arc<dyn FieldStrategy> {
        let property = strategy.property().to_string();
        let column = strategy.column().to_string();

        if let Some(owner) = self.columns.get(&column).cloned() {
            if owner != property {
                debug!(column = %column, evicted = %owner, "Column re-registered, evicting previous field");
                self.properties.shift_remove(&owner);
            }
        }
        if let Some(previous) = self.properties.get(&property) {
            self.columns.remove(previous.column());
        }

        if strategy.is_primary_key() {
            if let Some(existing) = self
                .properties
                .values()
                .find(|s| s.is_primary_key() && s.property() != property)
            {
                warn!(
                    property = %property,
                    existing = %existing.property(),
                    "Multiple primary key fields registered; the first one wins"
                );
            }
        }

        trace!(property = %property, column = %column, kind = ?strategy.kind(), "Field registered");
        self.columns.insert(column, property.clone());
        self.properties.insert(property, Arc::clone(&strategy));
        strategy
    }

    /// Unregisters the strategy for `property`.
    pub fn remove_type(&mut self, property: &str) -> Option<Arc<dyn FieldStrategy>> {
        let removed = self.properties.shift_remove(property)?;
        self.columns.remove(removed.column());
        Some(removed)
    }

    pub fn get_type_by_property(&self, property: &str) -> Option<&Arc<dyn FieldStrategy>> {
        self.properties.get(property)
    }

    pub fn get_type_by_column(&self, column: &str) -> Option<&Arc<dyn FieldStrategy>> {
        self.columns
            .get(column)
            .and_then(|property| self.properties.get(property))
    }

    /// All strategies in registration order.
    pub fn types(&self) -> impl Iterator<Item = &Arc<dyn FieldStrategy>> {
        self.properties.values()
    }

    /// Strategies participating in `access`, in registration order.
    pub fn types_with_access(&self, access: Access) -> impl Iterator<Item = &Arc<dyn FieldStrategy>> {
        self.properties.values().filter(move |s| s.has_access(access))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// The first strategy tagged as primary key, in registration order.
    pub fn get_primary_key(&self) -> Option<&Arc<dyn FieldStrategy>> {
        self.properties.values().find(|s| s.is_primary_key())
    }

    /// Every strategy tagged as primary key.
    pub fn primary_keys(&self) -> Vec<&Arc<dyn FieldStrategy>> {
        self.properties
            .values()
            .filter(|s| s.is_primary_key())
            .collect()
    }

    /// Loads `row` into `entity` (storage → domain).
    ///
    /// Each column with a strategy carrying `access` is decoded and set;
    /// columns whose strategy lacks `access` are skipped. Unmapped columns
    /// follow the map's [`UnmappedPolicy`]. Assignments are not rolled back
    /// if a later one is refused.
    pub fn load_object(
        &self,
        entity: &mut dyn Fields,
        row: &Row,
        access: Access,
    ) -> MapResult<LoadReport> {
        if self.unmapped == UnmappedPolicy::Reject {
            if let Some(column) = row.keys().find(|c| !self.columns.contains_key(c.as_str())) {
                return Err(MapError::UnmappedColumn(column.clone()));
            }
        }

        let mut report = LoadReport::default();
        for (column, raw) in row {
            let Some(strategy) = self.get_type_by_column(column) else {
                let passthrough =
                    self.unmapped == UnmappedPolicy::Passthrough && entity.accepts_dynamic();
                if passthrough && entity.set_field(column, FieldValue::from_raw(raw)) {
                    report.assigned += 1;
                } else {
                    report.extras.insert(column.clone(), raw.clone());
                }
                continue;
            };

            if !strategy.has_access(access) {
                trace!(column = %column, "Skipping field without access");
                continue;
            }

            let value = match strategy.property_from_raw(raw) {
                Ok(value) => value,
                Err(warning) => {
                    debug!(property = %warning.property, column = %warning.column, "{}", warning.message);
                    let fallback = warning.fallback_property();
                    report.warnings.push(warning);
                    fallback
                }
            };

            if entity.set_field(strategy.property(), value) {
                report.assigned += 1;
            } else {
                debug!(property = %strategy.property(), "Entity refused mapped property");
            }
        }

        Ok(report)
    }

    /// Loads `row` into a fresh [`Record`].
    pub fn load_record(&self, row: &Row, access: Access) -> MapResult<(Record, LoadReport)> {
        let mut record = Record::new();
        let report = self.load_object(&mut record, row, access)?;
        Ok((record, report))
    }

    /// Writes `entity` into `target` (domain → storage).
    ///
    /// Only strategies carrying `access` are written; the others leave no
    /// key at all. Properties the entity does not expose are skipped.
    pub fn load_array(
        &self,
        target: &mut Row,
        entity: &dyn Fields,
        access: Access,
    ) -> Vec<ConversionWarning> {
        let mut warnings = Vec::new();

        for strategy in self.types_with_access(access) {
            let Some(encoded) = strategy.to_column(entity) else {
                trace!(property = %strategy.property(), "Entity does not expose property");
                continue;
            };

            let raw = match encoded {
                Ok(raw) => raw,
                Err(warning) => {
                    debug!(property = %warning.property, column = %warning.column, "{}", warning.message);
                    let fallback = warning.fallback_column();
                    warnings.push(warning);
                    fallback
                }
            };
            target.insert(strategy.column().to_string(), raw);
        }

        warnings
    }

    /// Exports `entity` into a new row.
    pub fn get_array(&self, entity: &dyn Fields, access: Access) -> (Row, Vec<ConversionWarning>) {
        let mut row = Row::new();
        let warnings = self.load_array(&mut row, entity, access);
        (row, warnings)
    }
}
