//! Money fields.

use super::numeric_prefix;
use crate::strategy::{
    Conversion, Dialect, Encoded, FieldDef, FieldKind, FieldStrategy, WarningKind, raw_type_name,
};
use datamap_types::{Currency, FieldValue, Money};
use serde_json::Value;

/// A monetary amount in a fixed currency.
///
/// Databases store integer minor units (`1050` for $10.50). Forms exchange
/// the decimal major-unit string `"10.50"`; display tables render
/// `"AUD 10.50"`.
#[derive(Debug, Clone)]
pub struct MoneyType {
    def: FieldDef,
    currency: Currency,
    dialect: Dialect,
}

impl MoneyType {
    pub fn new(property: impl Into<String>, currency: Currency) -> Self {
        Self {
            def: FieldDef::new(property),
            currency,
            dialect: Dialect::Db,
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    fn minor_from_text(&self, s: &str) -> Conversion {
        if let Ok(amount) = s.parse::<i64>() {
            return Ok(FieldValue::Money(Money::from_minor(amount, self.currency)));
        }
        let fallback = numeric_prefix(s)
            .and_then(|p| p.parse::<f64>().ok())
            .map_or(FieldValue::Null, |f| {
                FieldValue::Money(Money::from_minor(f.round() as i64, self.currency))
            });
        Err(self.def.warn_property(
            WarningKind::Malformed,
            format!("{s:?} is not an amount in minor units"),
            fallback,
        ))
    }

    fn major_from_text(&self, s: &str) -> Conversion {
        let code = self.currency.code();
        let stripped = s
            .strip_prefix(code)
            .unwrap_or(s)
            .trim()
            .trim_start_matches(['$', '€', '£', '¥'])
            .trim();
        Money::parse_decimal(stripped, self.currency)
            .map(FieldValue::Money)
            .map_err(|e| self.def.warn_property(WarningKind::Malformed, e.to_string(), FieldValue::Null))
    }
}

impl FieldStrategy for MoneyType {
    fn def(&self) -> &FieldDef {
        &self.def
    }

    fn def_mut(&mut self) -> &mut FieldDef {
        &mut self.def
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Money
    }

    fn decode(&self, raw: &Value) -> Conversion {
        match (self.dialect, raw) {
            (_, Value::String(s)) if s.trim().is_empty() => Ok(FieldValue::Null),
            (Dialect::Db, Value::Number(n)) => match n.as_i64() {
                Some(amount) => Ok(FieldValue::Money(Money::from_minor(amount, self.currency))),
                None => {
                    let f = n.as_f64().unwrap_or_default();
                    let money = FieldValue::Money(Money::from_minor(f.round() as i64, self.currency));
                    Err(self.def.warn_property(
                        WarningKind::Malformed,
                        format!("fractional minor units {f}"),
                        money,
                    ))
                }
            },
            (Dialect::Db, Value::String(s)) => self.minor_from_text(s.trim()),
            (_, Value::Number(n)) => {
                let major = n.as_f64().unwrap_or_default();
                let amount = (major * self.currency.scale() as f64).round() as i64;
                Ok(FieldValue::Money(Money::from_minor(amount, self.currency)))
            }
            (_, Value::String(s)) => self.major_from_text(s.trim()),
            (_, other) => Err(self.def.warn_property(
                WarningKind::TypeMismatch,
                format!("{} in a money column", raw_type_name(other)),
                FieldValue::Null,
            )),
        }
    }

    fn encode(&self, value: &FieldValue) -> Encoded {
        let money = match value {
            FieldValue::Money(m) => *m,
            FieldValue::Int(minor) => Money::from_minor(*minor, self.currency),
            FieldValue::Decimal(major) => Money::from_minor(
                (major * self.currency.scale() as f64).round() as i64,
                self.currency,
            ),
            other => return Err(self.def.mismatch("money", other)),
        };

        let rendered = match self.dialect {
            Dialect::Db => Value::from(money.amount()),
            Dialect::Form => Value::String(money.to_decimal_string()),
            Dialect::Table => Value::String(money.to_string()),
        };

        if money.currency() != self.currency {
            return Err(self.def.warn_column(
                WarningKind::TypeMismatch,
                format!(
                    "amount in {} written to a {} column",
                    money.currency(),
                    self.currency
                ),
                rendered,
            ));
        }
        Ok(rendered)
    }
}
