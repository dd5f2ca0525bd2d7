//! Reading spreadsheet files into [`SheetTable`]s.

use std::path::Path;

use calamine::{Data, Reader, Sheets, open_workbook_auto};
use csv::ReaderBuilder;
use tracing::{debug, info};

use pcell_model::RawValue;

use crate::error::{IngestError, Result};
use crate::table::SheetTable;

/// Extensions read through calamine.
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Every extension accepted by [`read_workbook`].
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv"];

pub fn is_spreadsheet(path: &Path) -> bool {
    extension(path).is_some_and(|ext| SPREADSHEET_EXTENSIONS.contains(&ext.as_str()))
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Reads every sheet of a workbook, or the single table of a CSV file.
pub fn read_workbook(path: &Path) -> Result<Vec<SheetTable>> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let tables = match extension(path).as_deref() {
        Some("csv") => vec![read_csv_table(path)?],
        Some(ext) if WORKBOOK_EXTENSIONS.contains(&ext) => read_sheets(path)?,
        _ => {
            return Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };
    info!(
        file = %file_label(path),
        sheets = tables.len(),
        rows = tables.iter().map(SheetTable::row_count).sum::<usize>(),
        "read spreadsheet"
    );
    Ok(tables)
}

pub fn read_csv_table(path: &Path) -> Result<SheetTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
    let mut matrix = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        matrix.push(record.iter().map(RawValue::from).collect());
    }
    Ok(SheetTable::from_matrix(file_label(path), "", matrix))
}

/// Reads all sheets through calamine. Sheets without a header row are
/// skipped.
pub fn read_sheets(path: &Path) -> Result<Vec<SheetTable>> {
    let mut workbook: Sheets<_> =
        open_workbook_auto(path).map_err(|source| IngestError::Workbook {
            path: path.to_path_buf(),
            source,
        })?;
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let source = file_label(path);

    let mut tables = Vec::with_capacity(sheet_names.len());
    for sheet_name in sheet_names {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|source| IngestError::Sheet {
                path: path.to_path_buf(),
                sheet: sheet_name.clone(),
                source,
            })?;
        let matrix: Vec<Vec<RawValue>> = range
            .rows()
            .map(|row| row.iter().map(raw_value).collect())
            .collect();
        let table = SheetTable::from_matrix(source.clone(), sheet_name, matrix);
        if table.headers.is_empty() {
            debug!(sheet = %table.sheet, "skipping empty sheet");
            continue;
        }
        tables.push(table);
    }
    Ok(tables)
}

/// Converts a calamine cell. Dates stay numeric serials for the coercer.
fn raw_value(cell: &Data) -> RawValue {
    match cell {
        Data::Empty => RawValue::Empty,
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => {
            RawValue::from(text.as_str())
        }
        Data::Float(value) => RawValue::Number(*value),
        Data::Int(value) => RawValue::Number(*value as f64),
        Data::Bool(value) => RawValue::Bool(*value),
        Data::DateTime(moment) => RawValue::Number(moment.as_f64()),
        Data::Error(_) => RawValue::Empty,
    }
}
