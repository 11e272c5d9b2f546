//! Money value objects.
//!
//! Amounts are held as integer minor units (cents for AUD/USD, whole yen for
//! JPY) so no floating point rounding ever touches a stored value.

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Currencies without a minor unit.
const ZERO_DECIMAL: &[&str] = &["CLP", "ISK", "JPY", "KRW", "PYG", "UGX", "VND", "XAF", "XOF"];

/// Currencies with three minor digits.
const THREE_DECIMAL: &[&str] = &["BHD", "IQD", "JOD", "KWD", "LYD", "OMR", "TND"];

/// An ISO-4217 alphabetic currency code with its minor-unit exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Currency {
    code: [u8; 3],
    exponent: u8,
}

impl Currency {
    /// Parses a three-letter code, normalizing to uppercase.
    pub fn parse(code: &str) -> Result<Self> {
        let trimmed = code.trim();
        let bytes = trimmed.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(Error::InvalidCurrency(code.to_string()));
        }

        let mut upper = [0u8; 3];
        for (dst, src) in upper.iter_mut().zip(bytes) {
            *dst = src.to_ascii_uppercase();
        }

        let as_str = std::str::from_utf8(&upper).map_err(|_| Error::InvalidCurrency(code.into()))?;
        let exponent = if ZERO_DECIMAL.contains(&as_str) {
            0
        } else if THREE_DECIMAL.contains(&as_str) {
            3
        } else {
            2
        };

        Ok(Self {
            code: upper,
            exponent,
        })
    }

    /// The uppercase alphabetic code, e.g. `"AUD"`.
    #[must_use]
    pub fn code(&self) -> &str {
        // Only ever constructed from ASCII letters.
        std::str::from_utf8(&self.code).unwrap_or("XXX")
    }

    /// Number of minor-unit digits.
    #[must_use]
    pub const fn exponent(&self) -> u8 {
        self.exponent
    }

    /// Minor units per major unit (100 for cents).
    #[must_use]
    pub fn scale(&self) -> i64 {
        10i64.pow(u32::from(self.exponent))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Currency::parse(&code).map_err(serde::de::Error::custom)
    }
}

/// An amount of money in integer minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: i64,
    currency: Currency,
}

impl Money {
    /// Creates a value from minor units (1050 AUD = $10.50).
    #[must_use]
    pub const fn from_minor(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Parses a decimal major-unit string such as `"10.50"` or `"-1,200.5"`.
    ///
    /// Digits beyond the currency's exponent are rounded half away from zero.
    pub fn parse_decimal(input: &str, currency: Currency) -> Result<Self> {
        let invalid = || Error::InvalidAmount(input.to_string());

        let cleaned: String = input
            .trim()
            .chars()
            .filter(|c| *c != ',' && *c != '_')
            .collect();
        let (negative, digits) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
        };

        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let exponent = usize::from(currency.exponent);
        let whole_units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };

        let mut kept: String = frac.chars().take(exponent).collect();
        while kept.len() < exponent {
            kept.push('0');
        }
        let frac_units: i64 = if kept.is_empty() {
            0
        } else {
            kept.parse().map_err(|_| invalid())?
        };
        let round_up = frac.as_bytes().get(exponent).is_some_and(|d| *d >= b'5');

        let mut amount = whole_units
            .checked_mul(currency.scale())
            .and_then(|v| v.checked_add(frac_units))
            .and_then(|v| if round_up { v.checked_add(1) } else { Some(v) })
            .ok_or_else(invalid)?;
        if negative {
            amount = -amount;
        }

        Ok(Self { amount, currency })
    }

    /// Amount in minor units.
    #[must_use]
    pub const fn amount(&self) -> i64 {
        self.amount
    }

    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Major-unit decimal rendering without the currency code: `"10.50"`.
    #[must_use]
    pub fn to_decimal_string(&self) -> String {
        let exponent = usize::from(self.currency.exponent);
        if exponent == 0 {
            return self.amount.to_string();
        }

        let scale = self.currency.scale().unsigned_abs();
        let abs = self.amount.unsigned_abs();
        let sign = if self.amount < 0 { "-" } else { "" };
        format!(
            "{sign}{}.{:0width$}",
            abs / scale,
            abs % scale,
            width = exponent
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency, self.to_decimal_string())
    }
}
