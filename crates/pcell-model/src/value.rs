//! Typed cell values and the lenient numeric helpers shared by every crate.

use std::fmt;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// A coerced value ready to be written into a record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Numeric view of the value. Text is parsed leniently.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Number(value) => Some(*value),
            Self::Text(text) => parse_number(text),
        }
    }

    /// Whole-number view of the value; fractional parts are truncated.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            other => other
                .as_f64()
                .filter(|value| value.abs() < i64::MAX as f64)
                .map(|value| value.trunc() as i64),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Number(value) => f.write_str(&format_number(*value)),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Parses the first number found in `text`.
///
/// Thousands separators are ignored and leading currency marks or trailing
/// units are skipped, so `"Rs. 1,20,000"` and `"4.5 LPA"` both parse.
pub fn parse_number(text: &str) -> Option<f64> {
    let chars: Vec<char> = text.trim().chars().filter(|ch| *ch != ',').collect();
    let digit_at = |index: usize| chars.get(index).is_some_and(char::is_ascii_digit);
    let start = (0..chars.len()).find(|&index| match chars[index] {
        ch if ch.is_ascii_digit() => true,
        '.' => digit_at(index + 1),
        '-' => digit_at(index + 1) || (chars.get(index + 1) == Some(&'.') && digit_at(index + 2)),
        _ => false,
    })?;

    let mut number = String::new();
    let mut seen_dot = false;
    for (offset, &ch) in chars[start..].iter().enumerate() {
        match ch {
            '-' if offset == 0 => number.push('-'),
            '.' if !seen_dot => {
                seen_dot = true;
                number.push('.');
            }
            ch if ch.is_ascii_digit() => number.push(ch),
            _ => break,
        }
    }
    number.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Formats a number without a trailing `.0` for whole values.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// The current calendar year in local time.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}
