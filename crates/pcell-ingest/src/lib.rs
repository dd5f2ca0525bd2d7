pub mod clipboard;
pub mod discovery;
pub mod error;
pub mod table;
pub mod workbook;

pub use clipboard::{
    CLIPBOARD_SOURCE, looks_like_header, parse_clipboard, parse_column, split_matrix, to_tsv,
};
pub use discovery::{expand_paths, list_sheet_files};
pub use error::{IngestError, Result};
pub use table::SheetTable;
pub use workbook::{
    SPREADSHEET_EXTENSIONS, is_spreadsheet, read_csv_table, read_sheets, read_workbook,
};
