//! Error types for spreadsheet and clipboard ingestion.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("unsupported spreadsheet format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to open workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("failed to read sheet '{sheet}' in {path}: {source}")]
    Sheet {
        path: PathBuf,
        sheet: String,
        #[source]
        source: calamine::Error,
    },

    #[error("clipboard text is empty")]
    ClipboardEmpty,

    #[error("first clipboard row has no recognizable headers")]
    MissingHeaders,
}

impl IngestError {
    /// Notification text for the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::DirectoryNotFound { path } | Self::FileNotFound { path } => {
                format!("{} does not exist.", path.display())
            }
            Self::DirectoryRead { path, .. } => format!("Could not open folder {}.", path.display()),
            Self::UnsupportedFormat { path } => format!(
                "{} is not a spreadsheet. Use .xlsx, .xls, .ods or .csv files.",
                path.display()
            ),
            Self::CsvParse { path, .. } | Self::Workbook { path, .. } => {
                format!("Failed to parse {}.", path.display())
            }
            Self::Sheet { path, sheet, .. } => {
                format!("Failed to read sheet '{sheet}' in {}.", path.display())
            }
            Self::ClipboardEmpty => "Clipboard is empty. Copy rows from a spreadsheet first.".to_string(),
            Self::MissingHeaders => "Could not find headers in the pasted data. Include the header row (e.g. Name, Company, Salary) when copying.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
