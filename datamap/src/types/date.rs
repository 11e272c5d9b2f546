//! Date, datetime, time and year fields.
//!
//! Columns are parsed with the field's [`DateFormat`]; when that fails a few
//! common ISO layouts are tried before giving up. A "zero date"
//! (`0000-00-00 00:00:00`) reads as null for nullable fields and as the
//! current local time otherwise, matching what legacy MySQL schemas expect.

use super::is_zero_date;
use crate::error::MapResult;
use crate::format::DateFormat;
use crate::strategy::{Conversion, Encoded, FieldDef, FieldKind, FieldStrategy, WarningKind};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};
use datamap_types::FieldValue;
use serde_json::Value;
use std::fmt::Write;

const FALLBACK_DATE_TIMES: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

fn parse_date_time(s: &str, format: &DateFormat) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, format.strftime()) {
        return Some(dt);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    FALLBACK_DATE_TIMES
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, format.strftime())
                .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

fn parse_date(s: &str, format: &DateFormat) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, format.strftime())
        .ok()
        .or_else(|| parse_date_time(s, &DateFormat::date_time()).map(|dt| dt.date()))
}

fn parse_time(s: &str, format: &DateFormat) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, format.strftime())
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S%.f"))
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
        .or_else(|| parse_date_time(s, &DateFormat::date_time()).map(|dt| dt.time()))
}

fn from_timestamp(secs: i64) -> Option<NaiveDateTime> {
    chrono::DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
}

/// Renders through `write!` so a bad format surfaces as an error, not a panic.
fn render(def: &FieldDef, item: impl std::fmt::Display, format: &DateFormat) -> Encoded {
    let mut out = String::new();
    write!(out, "{item}").map_err(|_| {
        def.warn_column(
            WarningKind::Malformed,
            format!("cannot format with {format}"),
            Value::Null,
        )
    })?;
    Ok(Value::String(out))
}

/// Shared parse-or-fallback flow for the string-based temporal types.
fn decode_temporal(
    def: &FieldDef,
    raw: &Value,
    nullable: bool,
    sentinel: bool,
    parse: impl Fn(&str) -> Option<FieldValue>,
    from_secs: impl Fn(i64) -> Option<FieldValue>,
    now: impl Fn() -> FieldValue,
) -> Conversion {
    let fallback = || if nullable { FieldValue::Null } else { now() };

    match raw {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(FieldValue::Null);
            }
            if sentinel && is_zero_date(s) {
                return Ok(fallback());
            }
            parse(s).ok_or_else(|| {
                def.warn_property(
                    WarningKind::Malformed,
                    format!("unparseable date {s:?}"),
                    fallback(),
                )
            })
        }
        Value::Number(n) => match n.as_i64().and_then(&from_secs) {
            Some(v) => Ok(v),
            None => Err(def.warn_property(
                WarningKind::OutOfRange,
                format!("timestamp {n} out of range"),
                fallback(),
            )),
        },
        other => Err(def.warn_property(
            WarningKind::TypeMismatch,
            format!("{other} is not a date"),
            fallback(),
        )),
    }
}

/// A timestamp field (`Y-m-d H:i:s` by default).
#[derive(Debug, Clone)]
pub struct DateTime {
    def: FieldDef,
    format: DateFormat,
    nullable: bool,
}

impl DateTime {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            def: FieldDef::new(property),
            format: DateFormat::date_time(),
            nullable: true,
        }
    }

    /// Sets the storage format (PHP tokens or strftime).
    pub fn with_format(mut self, format: &str) -> MapResult<Self> {
        self.format = DateFormat::parse(format)?;
        Ok(self)
    }

    /// Non-nullable fields read zero or unparseable dates as "now".
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn format(&self) -> &DateFormat {
        &self.format
    }
}

impl FieldStrategy for DateTime {
    fn def(&self) -> &FieldDef {
        &self.def
    }

    fn def_mut(&mut self) -> &mut FieldDef {
        &mut self.def
    }

    fn kind(&self) -> FieldKind {
        FieldKind::DateTime
    }

    fn decode(&self, raw: &Value) -> Conversion {
        decode_temporal(
            &self.def,
            raw,
            self.nullable,
            true,
            |s| parse_date_time(s, &self.format).map(FieldValue::DateTime),
            |secs| from_timestamp(secs).map(FieldValue::DateTime),
            || FieldValue::DateTime(Local::now().naive_local()),
        )
    }

    fn encode(&self, value: &FieldValue) -> Encoded {
        let dt = match value {
            FieldValue::DateTime(dt) => *dt,
            FieldValue::Date(d) => d.and_time(NaiveTime::MIN),
            other => return Err(self.def.mismatch("datetime", other)),
        };
        render(&self.def, dt.format(self.format.strftime()), &self.format)
    }
}

/// A calendar date field (`Y-m-d` by default).
#[derive(Debug, Clone)]
pub struct Date {
    def: FieldDef,
    format: DateFormat,
    nullable: bool,
}

impl Date {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            def: FieldDef::new(property),
            format: DateFormat::date(),
            nullable: true,
        }
    }

    pub fn with_format(mut self, format: &str) -> MapResult<Self> {
        self.format = DateFormat::parse(format)?;
        Ok(self)
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

impl FieldStrategy for Date {
    fn def(&self) -> &FieldDef {
        &self.def
    }

    fn def_mut(&mut self) -> &mut FieldDef {
        &mut self.def
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Date
    }

    fn decode(&self, raw: &Value) -> Conversion {
        decode_temporal(
            &self.def,
            raw,
            self.nullable,
            true,
            |s| parse_date(s, &self.format).map(FieldValue::Date),
            |secs| from_timestamp(secs).map(|dt| FieldValue::Date(dt.date())),
            || FieldValue::Date(Local::now().date_naive()),
        )
    }

    fn encode(&self, value: &FieldValue) -> Encoded {
        let date = match value {
            FieldValue::Date(d) => *d,
            FieldValue::DateTime(dt) => dt.date(),
            other => return Err(self.def.mismatch("date", other)),
        };
        render(&self.def, date.format(self.format.strftime()), &self.format)
    }
}

/// A time-of-day field (`H:i:s` by default).
///
/// Midnight is a valid time, so there is no zero-date sentinel here.
#[derive(Debug, Clone)]
pub struct Time {
    def: FieldDef,
    format: DateFormat,
    nullable: bool,
}

impl Time {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            def: FieldDef::new(property),
            format: DateFormat::time(),
            nullable: true,
        }
    }

    pub fn with_format(mut self, format: &str) -> MapResult<Self> {
        self.format = DateFormat::parse(format)?;
        Ok(self)
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

impl FieldStrategy for Time {
    fn def(&self) -> &FieldDef {
        &self.def
    }

    fn def_mut(&mut self) -> &mut FieldDef {
        &mut self.def
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Time
    }

    fn decode(&self, raw: &Value) -> Conversion {
        decode_temporal(
            &self.def,
            raw,
            self.nullable,
            false,
            |s| parse_time(s, &self.format).map(FieldValue::Time),
            |secs| from_timestamp(secs).map(|dt| FieldValue::Time(dt.time())),
            || FieldValue::Time(Local::now().time()),
        )
    }

    fn encode(&self, value: &FieldValue) -> Encoded {
        let time = match value {
            FieldValue::Time(t) => *t,
            FieldValue::DateTime(dt) => dt.time(),
            other => return Err(self.def.mismatch("time", other)),
        };
        render(&self.def, time.format(self.format.strftime()), &self.format)
    }
}

/// A four-digit year field, stored as `"2024"`.
///
/// Full dates are accepted on read and reduced to their year.
#[derive(Debug, Clone)]
pub struct Year {
    def: FieldDef,
    nullable: bool,
}

impl Year {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            def: FieldDef::new(property),
            nullable: true,
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    fn parse(s: &str) -> Option<i32> {
        if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
            return s.parse().ok();
        }
        parse_date(s, &DateFormat::date()).map(|d| d.year())
    }
}

impl FieldStrategy for Year {
    fn def(&self) -> &FieldDef {
        &self.def
    }

    fn def_mut(&mut self) -> &mut FieldDef {
        &mut self.def
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Year
    }

    fn decode(&self, raw: &Value) -> Conversion {
        if let Some(n) = raw.as_i64() {
            return match i32::try_from(n) {
                Ok(0) if !self.nullable => Ok(FieldValue::Year(Local::now().year())),
                Ok(0) => Ok(FieldValue::Null),
                Ok(y) => Ok(FieldValue::Year(y)),
                Err(_) => Err(self.def.warn_property(
                    WarningKind::OutOfRange,
                    format!("year {n} out of range"),
                    FieldValue::Null,
                )),
            };
        }

        decode_temporal(
            &self.def,
            raw,
            self.nullable,
            true,
            |s| Self::parse(s).map(FieldValue::Year),
            |_| None,
            || FieldValue::Year(Local::now().year()),
        )
    }

    fn encode(&self, value: &FieldValue) -> Encoded {
        let year = match value {
            FieldValue::Year(y) => i64::from(*y),
            FieldValue::Int(i) => *i,
            FieldValue::Date(d) => i64::from(d.year()),
            FieldValue::DateTime(dt) => i64::from(dt.year()),
            other => return Err(self.def.mismatch("year", other)),
        };
        Ok(Value::String(format!("{year:04}")))
    }
}
