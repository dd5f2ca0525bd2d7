//! Header detection over a raw cell matrix.

use std::collections::BTreeMap;

use pcell_model::{RawValue, SourceRow};

/// One sheet (or CSV file, or clipboard block) with its header row.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    /// File name or `clipboard`.
    pub source: String,
    pub sheet: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawValue>>,
}

impl SheetTable {
    /// Builds a table whose header is the first non-blank row.
    ///
    /// Header text is trimmed and whitespace-collapsed, blank header cells are
    /// named by position, and repeated headers get `_1`, `_2`, ... suffixes.
    /// Blank data rows are dropped; short rows are padded with empty cells.
    pub fn from_matrix(
        source: impl Into<String>,
        sheet: impl Into<String>,
        matrix: Vec<Vec<RawValue>>,
    ) -> Self {
        let mut rows = matrix
            .into_iter()
            .filter(|row| row.iter().any(|cell| !cell.is_empty()));
        let headers = rows
            .next()
            .map(|row| dedupe_headers(row.iter().map(RawValue::to_text)))
            .unwrap_or_default();
        let width = headers.len();
        let rows = rows
            .map(|mut row| {
                row.resize(width.max(row.len()), RawValue::Empty);
                row.truncate(width);
                row
            })
            .collect();
        Self {
            source: source.into(),
            sheet: sheet.into(),
            headers,
            rows,
        }
    }

    /// Human-readable origin, e.g. `batch.xlsx [Sheet1]`.
    pub fn label(&self) -> String {
        if self.sheet.is_empty() {
            self.source.clone()
        } else {
            format!("{} [{}]", self.source, self.sheet)
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows keyed by header.
    pub fn source_rows(&self) -> Vec<SourceRow> {
        self.rows
            .iter()
            .map(|row| {
                SourceRow::new(
                    self.headers
                        .iter()
                        .cloned()
                        .zip(row.iter().cloned())
                        .collect(),
                )
            })
            .collect()
    }
}

pub(crate) fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn dedupe_headers(raw: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    raw.enumerate()
        .map(|(index, text)| {
            let header = normalize_header(&text);
            let header = if header.is_empty() {
                format!("column_{}", index + 1)
            } else {
                header
            };
            let count = seen.entry(header.clone()).or_insert(0);
            let name = if *count == 0 {
                header
            } else {
                format!("{header}_{count}")
            };
            *count += 1;
            name
        })
        .collect()
}
