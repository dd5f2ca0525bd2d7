//! Writing export tables to `.xlsx` and `.csv`.

use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use tracing::{info, warn};

use pcell_model::{ColumnSet, PlacementRecord};

use crate::error::{ExportError, Result};
use crate::options::{ExportFormat, ExportOptions};
use crate::table::{ExportCell, ExportSheet, ExportTable, build_sheets, build_table};

/// What an export wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// File that was written.
    pub path: PathBuf,
    pub format: ExportFormat,
    /// Sheet name and data row count, in workbook order.
    pub sheets: Vec<(String, usize)>,
    pub records: usize,
}

/// Exports `records` (already filtered) to `path`; the format follows the
/// file extension.
pub fn export_records(
    records: &[&PlacementRecord],
    columns: &ColumnSet,
    path: &Path,
    options: &ExportOptions,
) -> Result<ExportSummary> {
    if records.is_empty() {
        return Err(ExportError::NoRecords);
    }
    let format = ExportFormat::from_path(path).ok_or_else(|| ExportError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    ensure_parent_dir(path)?;

    let sheets = match format {
        ExportFormat::Xlsx => {
            let sheets = build_sheets(records, columns, options);
            write_xlsx(&sheets, path)?;
            sheets
        }
        ExportFormat::Csv => {
            if options.group_by_offer_type {
                warn!("CSV holds one sheet; ignoring offer type grouping");
            }
            let table = build_table(records, columns, options);
            write_csv(&table, path)?;
            vec![ExportSheet {
                name: String::new(),
                table,
            }]
        }
    };

    let summary = ExportSummary {
        path: path.to_path_buf(),
        format,
        sheets: sheets
            .iter()
            .map(|sheet| (sheet.name.clone(), sheet.table.rows.len()))
            .collect(),
        records: records.len(),
    };
    info!(
        path = %path.display(),
        records = summary.records,
        sheets = summary.sheets.len(),
        "exported records"
    );
    Ok(summary)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ExportError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

pub fn write_xlsx(sheets: &[ExportSheet], path: &Path) -> Result<()> {
    let to_error = |source: XlsxError| ExportError::Xlsx {
        path: path.to_path_buf(),
        source,
    };
    let header_format = Format::new().set_bold();
    let mut workbook = Workbook::new();
    for sheet in sheets {
        let worksheet = workbook
            .add_worksheet()
            .set_name(&sheet.name)
            .map_err(to_error)?;
        write_sheet(worksheet, &sheet.table, &header_format).map_err(to_error)?;
    }
    workbook.save(path).map_err(to_error)
}

fn write_sheet(
    worksheet: &mut Worksheet,
    table: &ExportTable,
    header_format: &Format,
) -> std::result::Result<(), XlsxError> {
    for (col, header) in (0u16..).zip(&table.headers) {
        worksheet.write_string_with_format(0, col, header, header_format)?;
    }
    for (row, cells) in (1u32..).zip(&table.rows) {
        for (col, cell) in (0u16..).zip(cells) {
            match cell {
                ExportCell::Number(value) => worksheet.write_number(row, col, *value)?,
                ExportCell::Text(text) if text.is_empty() => continue,
                ExportCell::Text(text) => worksheet.write_string(row, col, text)?,
            };
        }
    }
    worksheet.set_freeze_panes(1, 0)?;
    worksheet.autofit();
    Ok(())
}

pub fn write_csv(table: &ExportTable, path: &Path) -> Result<()> {
    let to_error = |source: csv::Error| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(to_error)?;
    writer.write_record(&table.headers).map_err(to_error)?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(ExportCell::to_text))
            .map_err(to_error)?;
    }
    writer
        .flush()
        .map_err(|source| to_error(csv::Error::from(source)))
}
