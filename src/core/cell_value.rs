//! Typed cell values
//!
//! Converts the stored value of a cell (as declared by the reader) into a
//! closed set of native values. Anything the reader declares but that cannot
//! be represented is an error for that cell, never a silent null.

use crate::error::{ExtractError, ExtractResult};
use calamine::Data;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use iso8601_duration::Duration as IsoDuration;
use serde::{Serialize, Serializer};
use std::fmt;

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Excel error literal such as `#N/A` or `#DIV/0!`
    Error(String),
    DateTime(NaiveDateTime),
    Duration(Duration),
}

/// Coerce a raw cell (absent = never written) into a [`CellValue`].
///
/// `address` is only used for error context.
pub fn coerce(raw: Option<&Data>, address: &str) -> ExtractResult<CellValue> {
    let Some(raw) = raw else {
        return Ok(CellValue::Null);
    };

    let value = match raw {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::DateTime(excel) if excel.is_duration() => excel
            .as_duration()
            .map(CellValue::Duration)
            .ok_or_else(|| unsupported("duration", address))?,
        Data::DateTime(excel) => excel
            .as_datetime()
            .map(CellValue::DateTime)
            .ok_or_else(|| unsupported("datetime", address))?,
        Data::DateTimeIso(text) => parse_iso_datetime(text)
            .map(CellValue::DateTime)
            .ok_or_else(|| unsupported("datetime-iso", address))?,
        Data::DurationIso(text) => parse_iso_duration(text)
            .map(CellValue::Duration)
            .ok_or_else(|| unsupported("duration-iso", address))?,
    };
    Ok(value)
}

fn unsupported(kind: &str, address: &str) -> ExtractError {
    ExtractError::UnsupportedCellType {
        kind: kind.to_string(),
        address: address.to_string(),
    }
}

fn parse_iso_datetime(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Day/time ISO 8601 durations only; years and months have no fixed length
fn parse_iso_duration(text: &str) -> Option<Duration> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let duration = body.parse::<IsoDuration>().ok()?;
    if duration.year != 0.0 || duration.month != 0.0 {
        return None;
    }
    let seconds = ((duration.day as f64 * 24.0 + duration.hour as f64) * 60.0
        + duration.minute as f64)
        * 60.0
        + duration.second as f64;
    let millis = (seconds * 1000.0).round() as i64;
    let duration = Duration::milliseconds(millis);
    Some(if negative { -duration } else { duration })
}

/// Format a number for display, removing unnecessary decimal places
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    let rounded = (n * 1e6).round() / 1e6;
    format!("{:.6}", rounded)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

impl CellValue {
    /// Blank cells carry no information: never written, or an empty string
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    /// Numeric reading of the value. Text is accepted when it parses once
    /// surrounding whitespace, thousands separators and `$` are removed.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(text) => {
                let cleaned: String = text
                    .trim()
                    .chars()
                    .filter(|c| *c != ',' && *c != '$')
                    .collect();
                if cleaned.is_empty() {
                    None
                } else {
                    cleaned.parse::<f64>().ok()
                }
            }
            _ => None,
        }
    }

    /// Trimmed display text, `None` when blank
    pub fn as_text(&self) -> Option<String> {
        if self.is_blank() {
            return None;
        }
        let text = self.to_string();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(true) => write!(f, "TRUE"),
            CellValue::Bool(false) => write!(f, "FALSE"),
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::Text(text) => write!(f, "{}", text),
            CellValue::Error(code) => write!(f, "{}", code),
            CellValue::DateTime(datetime) if datetime.time() == NaiveTime::MIN => {
                write!(f, "{}", datetime.format("%Y-%m-%d"))
            }
            CellValue::DateTime(datetime) => write!(f, "{}", datetime.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Duration(duration) => {
                let total = duration.num_seconds();
                let sign = if total < 0 { "-" } else { "" };
                let total = total.abs();
                write!(
                    f,
                    "{}{:02}:{:02}:{:02}",
                    sign,
                    total / 3600,
                    (total % 3600) / 60,
                    total % 60
                )
            }
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Null => serializer.serialize_none(),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            // Whole numbers are written as JSON integers
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 => {
                serializer.serialize_i64(*n as i64)
            }
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Text(text) => serializer.serialize_str(text),
            CellValue::Error(code) => serializer.serialize_str(code),
            CellValue::DateTime(datetime) => {
                serializer.serialize_str(&datetime.format(DATETIME_FORMAT).to_string())
            }
            CellValue::Duration(duration) => serializer.serialize_str(&duration.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    #[test]
    fn test_coerce_scalars() {
        assert_eq!(coerce(None, "A1").unwrap(), CellValue::Null);
        assert_eq!(coerce(Some(&Data::Empty), "A1").unwrap(), CellValue::Null);
        assert_eq!(coerce(Some(&Data::Bool(true)), "A1").unwrap(), CellValue::Bool(true));
        assert_eq!(coerce(Some(&Data::Int(7)), "A1").unwrap(), CellValue::Number(7.0));
        assert_eq!(coerce(Some(&Data::Float(2.5)), "A1").unwrap(), CellValue::Number(2.5));
        assert_eq!(
            coerce(Some(&Data::String("Main St".to_string())), "A1").unwrap(),
            CellValue::Text("Main St".to_string())
        );
        assert_eq!(
            coerce(Some(&Data::Error(CellErrorType::NA)), "A1").unwrap(),
            CellValue::Error("#N/A".to_string())
        );
    }

    #[test]
    fn test_coerce_iso_values() {
        let value = coerce(Some(&Data::DateTimeIso("2024-03-01".to_string())), "A1").unwrap();
        assert_eq!(
            value,
            CellValue::DateTime(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_time(NaiveTime::MIN))
        );

        let value = coerce(Some(&Data::DurationIso("PT1H30M".to_string())), "A1").unwrap();
        assert_eq!(value, CellValue::Duration(Duration::minutes(90)));
    }

    #[test]
    fn test_coerce_unrepresentable_is_an_error() {
        let result = coerce(Some(&Data::DateTimeIso("yesterday".to_string())), "Locations!C4");
        match result {
            Err(ExtractError::UnsupportedCellType { kind, address }) => {
                assert_eq!(kind, "datetime-iso");
                assert_eq!(address, "Locations!C4");
            }
            other => panic!("Expected UnsupportedCellType, got {:?}", other),
        }

        let result = coerce(Some(&Data::DurationIso("P1Y".to_string())), "A1");
        assert!(matches!(result, Err(ExtractError::UnsupportedCellType { .. })));
    }

    #[test]
    fn test_blank_and_numeric_readings() {
        assert!(CellValue::Null.is_blank());
        assert!(CellValue::Text(String::new()).is_blank());
        assert!(!CellValue::Number(0.0).is_blank());

        assert_eq!(CellValue::Text(" $1,250,000 ".to_string()).as_number(), Some(1_250_000.0));
        assert_eq!(CellValue::Text("n/a".to_string()).as_number(), None);
        assert_eq!(CellValue::Bool(true).as_number(), None);
        assert_eq!(CellValue::Text("  ".to_string()).as_text(), None);
        assert_eq!(CellValue::Number(0.25).as_text(), Some("0.25".to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Number(12345.0).to_string(), "12345");
        assert_eq!(CellValue::Number(0.1 + 0.2).to_string(), "0.3");
        assert_eq!(CellValue::Bool(false).to_string(), "FALSE");
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Duration(Duration::seconds(3725)).to_string(), "01:02:05");
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&vec![
            CellValue::Null,
            CellValue::Number(3.0),
            CellValue::Number(2.5),
            CellValue::Text("x".to_string()),
            CellValue::DateTime(
                NaiveDate::from_ymd_opt(2023, 7, 1)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap(),
            ),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,3,2.5,"x","2023-07-01T12:00:00"]"#);
    }
}
