//! Concrete field strategies.
//!
//! Every strategy is a small value holding a [`FieldDef`](crate::FieldDef)
//! plus its own options, and implements both conversion directions for one
//! data shape.

mod boolean;
mod date;
mod encrypt;
mod json;
mod list;
mod money;
mod number;
mod serial;
mod text;

pub use boolean::Boolean;
pub use date::{Date, DateTime, Time, Year};
pub use encrypt::TextEncrypt;
pub use json::Json;
pub use list::ArrayType;
pub use money::MoneyType;
pub use number::{Decimal, Integer};
pub use serial::Serial;
pub use text::Text;

/// Longest numeric prefix of `s` (`[+-]?digits[.digits][e[+-]digits]`),
/// the way loose string-to-number casts read "12abc" as 12.
pub(crate) fn numeric_prefix(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if frac_end > frac_start || digits > 0 {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    Some(&s[..end])
}

/// Whether `s` is a "zero date" such as `0000-00-00 00:00:00`.
pub(crate) fn is_zero_date(s: &str) -> bool {
    let mut saw_digit = false;
    for c in s.chars() {
        if c.is_ascii_digit() {
            if c != '0' {
                return false;
            }
            saw_digit = true;
        }
    }
    saw_digit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_prefix_reads_leading_number() {
        assert_eq!(numeric_prefix("12abc"), Some("12"));
        assert_eq!(numeric_prefix("-3.5kg"), Some("-3.5"));
        assert_eq!(numeric_prefix("1e3x"), Some("1e3"));
        assert_eq!(numeric_prefix("7e"), Some("7"));
        assert_eq!(numeric_prefix(".5"), Some(".5"));
        assert_eq!(numeric_prefix("5."), Some("5."));
        assert_eq!(numeric_prefix("abc"), None);
        assert_eq!(numeric_prefix("-"), None);
        assert_eq!(numeric_prefix("."), None);
    }

    #[test]
    fn zero_dates() {
        assert!(is_zero_date("0000-00-00 00:00:00"));
        assert!(is_zero_date("0000-00-00"));
        assert!(is_zero_date("0000"));
        assert!(!is_zero_date("2024-01-01"));
        assert!(!is_zero_date(""));
        assert!(!is_zero_date("--"));
    }
}
