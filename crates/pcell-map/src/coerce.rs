//! Coercion of raw cell values into typed field values.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use pcell_model::{FieldKind, FieldValue, RawValue, parse_number};

use crate::options::{DateFallback, NormalizeOptions};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Free-text layouts tried after the numeric day-first split.
const TEXT_DATE_FORMATS: &[&str] = &[
    "%d %B %Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%d-%b-%y",
    "%d %B, %Y",
    "%d %b, %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%Y/%m/%d",
];

const TEXT_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M"];

/// Coerces a raw cell for a field of the given kind.
pub fn coerce_value(kind: FieldKind, raw: &RawValue, options: &NormalizeOptions) -> FieldValue {
    match kind {
        FieldKind::Text => FieldValue::Text(raw.to_text()),
        FieldKind::Number => FieldValue::Number(coerce_number(raw).unwrap_or(0.0)),
        FieldKind::Integer => FieldValue::Integer(coerce_integer(raw).unwrap_or(0)),
        FieldKind::Year => FieldValue::Integer(
            coerce_integer(raw).unwrap_or_else(|| i64::from(options.default_year())),
        ),
        FieldKind::Date => FieldValue::Text(coerce_date(raw, options)),
    }
}

/// Coerces user-typed grid text.
pub fn coerce_text(kind: FieldKind, text: &str, options: &NormalizeOptions) -> FieldValue {
    coerce_value(kind, &RawValue::from(text), options)
}

pub fn coerce_number(raw: &RawValue) -> Option<f64> {
    match raw {
        RawValue::Number(value) => Some(*value),
        RawValue::Text(text) => parse_number(text),
        RawValue::Empty | RawValue::Bool(_) => None,
    }
}

fn coerce_integer(raw: &RawValue) -> Option<i64> {
    coerce_number(raw)
        .filter(|value| value.abs() < i64::MAX as f64)
        .map(|value| value.trunc() as i64)
}

/// Coerces a date cell to `YYYY-MM-DD`.
///
/// Empty cells stay empty. Numeric cells and purely numeric text are read
/// as spreadsheet serials. Anything unparseable follows the configured
/// fallback.
pub fn coerce_date(raw: &RawValue, options: &NormalizeOptions) -> String {
    let parsed = match raw {
        RawValue::Empty => return String::new(),
        RawValue::Bool(_) => None,
        RawValue::Number(serial) => serial_to_date(*serial, options),
        RawValue::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return String::new();
            }
            if is_serial_text(text) {
                text.parse::<f64>()
                    .ok()
                    .and_then(|serial| serial_to_date(serial, options))
            } else {
                parse_date_text(text)
            }
        }
    };

    match (parsed, options.date_fallback) {
        (Some(date), _) => date.format(DATE_FORMAT).to_string(),
        (None, DateFallback::Today) => options.today().format(DATE_FORMAT).to_string(),
        (None, DateFallback::Raw) => raw.to_text(),
    }
}

/// Converts a spreadsheet serial day number (with optional time fraction)
/// into a calendar date in UTC.
pub fn serial_to_date(serial: f64, options: &NormalizeOptions) -> Option<NaiveDate> {
    if !serial.is_finite() || serial <= 0.0 {
        return None;
    }
    let seconds = ((serial - options.epoch.unix_epoch_serial()) * 86_400.0).round();
    if seconds.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp(seconds as i64, 0).map(|moment| moment.date_naive())
}

fn is_serial_text(text: &str) -> bool {
    !text.contains(['-', '/']) && text.parse::<f64>().is_ok()
}

/// Parses free-text dates. Numeric `a/b/c` forms are day-first unless the
/// first part has four digits; two-digit years land in 2000-2099.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.contains('&') || text.to_ascii_lowercase().contains(" and ") {
        return None;
    }

    let parts: Vec<&str> = text.split(['.', '/', '-']).map(str::trim).collect();
    if parts.len() == 3 && parts.iter().all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())) {
        let numbers: Vec<u32> = parts.iter().filter_map(|part| part.parse().ok()).collect();
        if let [a, b, c] = numbers[..] {
            let date = if parts[0].len() == 4 {
                NaiveDate::from_ymd_opt(a as i32, b, c)
            } else {
                let year = if c < 100 { 2000 + c } else { c };
                NaiveDate::from_ymd_opt(year as i32, b, a)
            };
            if date.is_some() {
                return date;
            }
        }
    }

    if let Ok(moment) = DateTime::parse_from_rfc3339(text) {
        return Some(moment.date_naive());
    }
    for format in TEXT_DATETIME_FORMATS {
        if let Ok(moment) = NaiveDateTime::parse_from_str(text, format) {
            return Some(moment.date());
        }
    }
    TEXT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}
