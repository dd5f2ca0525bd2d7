//! Clipboard text (tab-separated, as copied from a spreadsheet).

use pcell_map::{HEADER_KEYWORDS, normalize_key};
use pcell_model::RawValue;

use crate::error::{IngestError, Result};
use crate::table::SheetTable;

pub const CLIPBOARD_SOURCE: &str = "clipboard";

/// Splits clipboard text into rows on newlines and columns on tabs.
///
/// Trailing blank lines are dropped. Cells wrapped in double quotes are
/// unquoted with `""` read as a literal quote.
pub fn split_matrix(text: &str) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .map(|line| line.split('\t').map(unquote).collect())
        .collect();
    while rows
        .last()
        .is_some_and(|row| row.iter().all(|cell| cell.trim().is_empty()))
    {
        rows.pop();
    }
    rows
}

/// Renders a matrix as clipboard text: tabs between columns, newlines
/// between rows.
pub fn to_tsv<S: AsRef<str>>(matrix: &[Vec<S>]) -> String {
    matrix
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| sanitize_cell(cell.as_ref()))
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// True when any cell of `row` contains a known header word.
pub fn looks_like_header<S: AsRef<str>>(row: &[S]) -> bool {
    row.iter().any(|cell| {
        let normalized = normalize_key(cell.as_ref());
        !normalized.is_empty()
            && HEADER_KEYWORDS
                .iter()
                .any(|keyword| normalized.contains(keyword))
    })
}

/// Parses a pasted block whose first non-blank row must be a header row.
///
/// There is no positional fallback: without recognizable headers the paste
/// is rejected.
pub fn parse_clipboard(text: &str) -> Result<SheetTable> {
    if text.trim().is_empty() {
        return Err(IngestError::ClipboardEmpty);
    }
    let matrix = split_matrix(text);
    let header = matrix
        .iter()
        .find(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .ok_or(IngestError::ClipboardEmpty)?;
    if !looks_like_header(header) {
        return Err(IngestError::MissingHeaders);
    }
    let matrix = matrix
        .into_iter()
        .map(|row| row.iter().map(|cell| RawValue::from(cell.as_str())).collect())
        .collect();
    let table = SheetTable::from_matrix(CLIPBOARD_SOURCE, "", matrix);
    tracing::info!(rows = table.row_count(), columns = table.headers.len(), "parsed clipboard");
    Ok(table)
}

/// One value per line, for pasting a single column. Trailing blank lines
/// are dropped; interior blank lines are kept as empty values.
pub fn parse_column(text: &str) -> Vec<String> {
    split_matrix(text)
        .into_iter()
        .map(|row| row.into_iter().next().unwrap_or_default().trim().to_string())
        .collect()
}

fn unquote(cell: &str) -> String {
    let trimmed = cell.trim_end_matches('\r');
    match trimmed
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) if trimmed.len() >= 2 => inner.replace("\"\"", "\""),
        _ => trimmed.to_string(),
    }
}

fn sanitize_cell(cell: &str) -> String {
    cell.replace(['\t', '\n', '\r'], " ")
}
