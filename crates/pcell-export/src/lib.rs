pub mod error;
pub mod options;
pub mod table;
pub mod writer;

pub use error::{ExportError, Result};
pub use options::{ExportFormat, ExportOptions, default_file_name};
pub use table::{
    ALL_RECORDS_SHEET, ExportCell, ExportSheet, ExportTable, SERIAL_HEADER, SINGLE_SHEET,
    build_sheets, build_table, sanitize_sheet_name,
};
pub use writer::{ExportSummary, export_records, write_csv, write_xlsx};
