//! Date format strings.
//!
//! Formats may be written with PHP `date()` tokens (`Y-m-d H:i:s`), the
//! convention of most legacy schemas, or directly as chrono strftime
//! (`%Y-%m-%d`). Any `%` in the input selects strftime.
//!
//! Field values are naive (no offset), so time zone tokens are rejected.

use crate::error::{MapError, MapResult};
use chrono::format::{Fixed, Item, StrftimeItems};
use std::fmt;

/// A validated chrono format string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateFormat {
    source: String,
    strftime: String,
}

impl DateFormat {
    pub const DATE_TIME: &'static str = "Y-m-d H:i:s";
    pub const DATE: &'static str = "Y-m-d";
    pub const TIME: &'static str = "H:i:s";

    /// Parses a PHP-style or strftime format string.
    pub fn parse(format: &str) -> MapResult<Self> {
        if format.is_empty() {
            return Err(MapError::DateFormat("empty format".to_string()));
        }

        let strftime = if format.contains('%') {
            format.to_string()
        } else {
            translate_php(format)?
        };

        for item in StrftimeItems::new(&strftime) {
            if matches!(item, Item::Error) {
                return Err(MapError::DateFormat(format.to_string()));
            }
            if needs_offset(&item) {
                return Err(MapError::DateFormat(format!(
                    "time zone in {format:?}; field values carry no offset"
                )));
            }
        }

        Ok(Self {
            source: format.to_string(),
            strftime,
        })
    }

    /// The format as written by the caller.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The equivalent chrono strftime string.
    pub fn strftime(&self) -> &str {
        &self.strftime
    }

    pub(crate) fn date_time() -> Self {
        Self::builtin(Self::DATE_TIME, "%Y-%m-%d %H:%M:%S")
    }

    pub(crate) fn date() -> Self {
        Self::builtin(Self::DATE, "%Y-%m-%d")
    }

    pub(crate) fn time() -> Self {
        Self::builtin(Self::TIME, "%H:%M:%S")
    }

    fn builtin(source: &str, strftime: &str) -> Self {
        Self {
            source: source.to_string(),
            strftime: strftime.to_string(),
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn needs_offset(item: &Item<'_>) -> bool {
    matches!(
        item,
        Item::Fixed(
            Fixed::TimezoneName
                | Fixed::TimezoneOffset
                | Fixed::TimezoneOffsetColon
                | Fixed::TimezoneOffsetDoubleColon
                | Fixed::TimezoneOffsetTripleColon
                | Fixed::TimezoneOffsetColonZ
                | Fixed::TimezoneOffsetZ
                | Fixed::RFC2822
                | Fixed::RFC3339
        )
    )
}

fn translate_php(format: &str) -> MapResult<String> {
    let mut out = String::with_capacity(format.len() * 2);
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        let token = match c {
            'd' => "%d",
            'j' => "%-d",
            'D' => "%a",
            'l' => "%A",
            'N' => "%u",
            'w' => "%w",
            'z' => "%j",
            'm' => "%m",
            'n' => "%-m",
            'M' => "%b",
            'F' => "%B",
            'Y' => "%Y",
            'y' => "%y",
            'H' => "%H",
            'G' => "%-H",
            'h' => "%I",
            'g' => "%-I",
            'i' => "%M",
            's' => "%S",
            'A' => "%p",
            'a' => "%P",
            'u' => "%6f",
            'v' => "%3f",
            'U' => "%s",
            '\\' => match chars.next() {
                Some(escaped) => {
                    out.push(escaped);
                    continue;
                }
                None => return Err(MapError::DateFormat(format!("dangling escape in {format:?}"))),
            },
            'S' | 't' | 'L' | 'B' | 'I' | 'e' | 'c' | 'r' | 'W' | 'o' | 'Z' | 'O' | 'P' | 'T' => {
                return Err(MapError::DateFormat(format!(
                    "unsupported token {c:?} in {format:?}"
                )));
            }
            literal => {
                out.push(literal);
                continue;
            }
        };
        out.push_str(token);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_common_php_formats() {
        assert_eq!(DateFormat::parse("Y-m-d H:i:s").unwrap().strftime(), "%Y-%m-%d %H:%M:%S");
        assert_eq!(DateFormat::parse("d/m/Y").unwrap().strftime(), "%d/%m/%Y");
        assert_eq!(DateFormat::parse("j M Y g:i A").unwrap().strftime(), "%-d %b %Y %-I:%M %p");
    }

    #[test]
    fn backslash_escapes_literals() {
        assert_eq!(DateFormat::parse("Y\\TH").unwrap().strftime(), "%YT%H");
    }

    #[test]
    fn strftime_passes_through() {
        let f = DateFormat::parse("%d.%m.%Y").unwrap();
        assert_eq!(f.strftime(), "%d.%m.%Y");
        assert_eq!(f.source(), "%d.%m.%Y");
    }

    #[test]
    fn rejects_bad_formats() {
        assert!(DateFormat::parse("").is_err());
        assert!(DateFormat::parse("Y-m-d\\").is_err());
        assert!(DateFormat::parse("jS F Y").is_err());
        assert!(DateFormat::parse("%Q").is_err());
    }

    #[test]
    fn rejects_time_zone_tokens() {
        for format in ["Y-m-d\\TH:i:sP", "Y-m-d H:i:s O", "Y-m-d H:i:s T", "%Y-%m-%d %z", "%Y %Z", "%+"] {
            assert!(
                matches!(DateFormat::parse(format), Err(MapError::DateFormat(_))),
                "{format}"
            );
        }
    }

    #[test]
    fn builtins_match_parsed() {
        assert_eq!(DateFormat::date_time(), DateFormat::parse(DateFormat::DATE_TIME).unwrap());
        assert_eq!(DateFormat::date(), DateFormat::parse(DateFormat::DATE).unwrap());
        assert_eq!(DateFormat::time(), DateFormat::parse(DateFormat::TIME).unwrap());
    }
}
