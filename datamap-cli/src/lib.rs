//! Pipeline behind the `datamap` binary.
//!
//! Reads a [`MapConfig`], pushes JSON rows through the resulting
//! [`DataMap`] and collects the converted output together with the number
//! of conversion warnings raised along the way.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use datamap::{Access, BuildContext, ConversionWarning, DataMap, MapConfig, Row, UnmappedPolicy};
use datamap_crypto::{KdfParams, Salt, TextKey};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

/// What to do with each input row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Decode rows into typed records.
    Import,
    /// Decode rows, then encode them back to storage rows.
    Roundtrip,
}

/// Result of processing a batch of rows.
#[derive(Debug, Default, Serialize)]
pub struct Outcome {
    pub rows: Vec<Value>,
    pub warnings: usize,
}

/// Derives the text key for encrypted fields from a passphrase and hex salt.
pub fn derive_key(passphrase: &str, salt_hex: &str) -> Result<TextKey> {
    let salt = Salt::from_hex(salt_hex).context("invalid key salt")?;
    TextKey::derive(passphrase, &salt, &KdfParams::default()).context("key derivation failed")
}

/// Pairs the passphrase and salt options into a key.
///
/// A passphrase without a salt is ignored, so `DATAMAP_KEY` can stay in the
/// environment for maps that have no encrypted fields. A salt without a
/// passphrase is an error.
pub fn resolve_key(passphrase: Option<&str>, salt_hex: Option<&str>) -> Result<Option<TextKey>> {
    match (passphrase, salt_hex) {
        (Some(passphrase), Some(salt)) => derive_key(passphrase, salt).map(Some),
        (None, Some(_)) => bail!("--key-salt given without a passphrase"),
        (Some(_), None) => {
            debug!("Passphrase set without --key-salt; encrypted fields disabled");
            Ok(None)
        }
        (None, None) => Ok(None),
    }
}

/// Loads a map definition and builds it.
///
/// `strict` overrides the configured policy with [`UnmappedPolicy::Reject`].
pub fn load_map(path: &Path, key: Option<TextKey>, strict: bool) -> Result<DataMap> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read map {}", path.display()))?;
    let config = MapConfig::from_json(&text)
        .with_context(|| format!("failed to parse map {}", path.display()))?;

    let ctx = BuildContext {
        text_key: key.map(Arc::new),
    };
    let mut map = config.build(&ctx).context("failed to build map")?;
    if strict {
        map.set_unmapped(UnmappedPolicy::Reject);
    }
    info!(fields = map.len(), unmapped = ?map.unmapped(), "Map loaded");
    Ok(map)
}

/// Reads a JSON array of row objects (or a single object).
pub fn read_rows(mut reader: impl Read) -> Result<Vec<Row>> {
    let mut text = String::new();
    reader.read_to_string(&mut text).context("failed to read input")?;
    let parsed: Value = serde_json::from_str(&text).context("input is not valid JSON")?;

    let items = match parsed {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        other => bail!("expected an array of objects, found {other}"),
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(row) => Ok(row),
            other => bail!("row {i} is not an object: {other}"),
        })
        .collect()
}

/// Runs every row through `map`.
pub fn process(map: &DataMap, rows: &[Row], mode: Mode) -> Result<Outcome> {
    let mut outcome = Outcome::default();

    for (i, row) in rows.iter().enumerate() {
        let (record, report) = map
            .load_record(row, Access::READ)
            .with_context(|| format!("row {i}"))?;

        for warning in &report.warnings {
            log_warning(i, warning);
        }
        if !report.extras.is_empty() {
            let names: Vec<_> = report.extras.keys().map(String::as_str).collect();
            debug!(row = i, columns = ?names, "Unmapped columns collected");
        }
        outcome.warnings += report.warnings.len();

        let out = match mode {
            Mode::Import => serde_json::to_value(&record).context("failed to serialize record")?,
            Mode::Roundtrip => {
                let (exported, warnings) = map.get_array(&record, Access::WRITE);
                for warning in &warnings {
                    log_warning(i, warning);
                }
                outcome.warnings += warnings.len();
                Value::Object(exported)
            }
        };
        outcome.rows.push(out);
    }

    Ok(outcome)
}

fn log_warning(row: usize, warning: &ConversionWarning) {
    warn!(
        row,
        property = %warning.property,
        column = %warning.column,
        kind = %warning.kind,
        direction = ?warning.direction(),
        "{}",
        warning.message
    );
}
