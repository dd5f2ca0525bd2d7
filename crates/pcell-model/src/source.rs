//! Untyped rows as read from a spreadsheet or the clipboard.

use crate::value::format_number;

/// A raw cell before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Empty,
    Text(String),
    /// Numeric cell; dates arrive here as spreadsheet serials.
    Number(f64),
    Bool(bool),
}

impl RawValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(_) | Self::Bool(_) => false,
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) => text.trim().to_string(),
            Self::Number(value) => format_number(*value),
            Self::Bool(true) => "TRUE".to_string(),
            Self::Bool(false) => "FALSE".to_string(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        if value.trim().is_empty() {
            Self::Empty
        } else {
            Self::Text(value.to_string())
        }
    }
}

/// One data row as `(header, value)` pairs in source column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceRow {
    pub cells: Vec<(String, RawValue)>,
}

impl SourceRow {
    pub fn new(cells: Vec<(String, RawValue)>) -> Self {
        Self { cells }
    }

    /// Zips headers with text values; missing trailing values are empty.
    pub fn from_text<H, V>(headers: &[H], values: &[V]) -> Self
    where
        H: AsRef<str>,
        V: AsRef<str>,
    {
        let cells = headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                let value = values
                    .get(index)
                    .map_or(RawValue::Empty, |value| RawValue::from(value.as_ref()));
                (header.as_ref().to_string(), value)
            })
            .collect();
        Self { cells }
    }

    pub fn get(&self, header: &str) -> Option<&RawValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == header)
            .map(|(_, value)| value)
    }

    pub fn non_empty_count(&self) -> usize {
        self.cells.iter().filter(|(_, value)| !value.is_empty()).count()
    }

    pub fn is_blank(&self) -> bool {
        self.non_empty_count() == 0
    }
}
