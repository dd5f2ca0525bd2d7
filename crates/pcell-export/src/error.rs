use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no records to export")]
    NoRecords,

    #[error("unsupported export format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write workbook {path}")]
    Xlsx {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("failed to write CSV {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl ExportError {
    pub fn user_message(&self) -> String {
        match self {
            Self::NoRecords => "No records to export.".to_string(),
            Self::UnsupportedFormat { path } => format!(
                "Cannot export to {}. Use a .xlsx or .csv file name.",
                path.display()
            ),
            Self::CreateDir { path, .. } => {
                format!("Could not create the folder {}.", path.display())
            }
            Self::Xlsx { path, .. } | Self::Csv { path, .. } => {
                format!("Could not write {}.", path.display())
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
