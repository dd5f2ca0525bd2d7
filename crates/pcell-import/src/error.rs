//! Import failures, one variant per user-visible outcome.

use thiserror::Error;

use pcell_ingest::IngestError;
use pcell_store::StoreError;

use crate::master::MasterKind;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read import source")]
    FileParse {
        #[source]
        source: IngestError,
    },

    #[error("clipboard text is empty")]
    ClipboardEmpty,

    #[error("pasted data has no header row")]
    MissingHeaders,

    #[error("no valid rows to import ({discarded} discarded)")]
    NoValidRows { discarded: usize },

    #[error("import of {rows} rows declined")]
    Declined { rows: usize },

    /// A batch failed after `committed` records were stored.
    #[error("import stopped after {committed} of {total} records")]
    PartialImport {
        committed: usize,
        total: usize,
        #[source]
        source: StoreError,
    },

    #[error("bulk insert failed")]
    Remote {
        #[source]
        source: StoreError,
    },

    #[error("no valid master {kind} rows ({discarded} discarded)")]
    NoValidMasterRows { kind: MasterKind, discarded: usize },

    #[error("failed to save master {kind}")]
    MasterUpsert {
        kind: MasterKind,
        #[source]
        source: StoreError,
    },
}

impl From<IngestError> for ImportError {
    fn from(error: IngestError) -> Self {
        match error {
            IngestError::ClipboardEmpty => Self::ClipboardEmpty,
            IngestError::MissingHeaders => Self::MissingHeaders,
            other => Self::FileParse { source: other },
        }
    }
}

impl ImportError {
    pub fn user_message(&self) -> String {
        match self {
            Self::FileParse { source } => source.user_message(),
            Self::ClipboardEmpty => IngestError::ClipboardEmpty.user_message(),
            Self::MissingHeaders => IngestError::MissingHeaders.user_message(),
            Self::NoValidRows { .. } => {
                "No valid records found. Every row needs at least a student name.".to_string()
            }
            Self::Declined { .. } => "Import cancelled.".to_string(),
            Self::PartialImport {
                committed, total, ..
            } => format!(
                "Imported {committed} of {total} records before the server failed. The remaining rows were not saved."
            ),
            Self::Remote { source } => source.user_message(),
            Self::NoValidMasterRows {
                kind: MasterKind::Students,
                ..
            } => "No valid student rows found. Check the register number and name headers."
                .to_string(),
            Self::NoValidMasterRows {
                kind: MasterKind::Companies,
                ..
            } => "No valid company rows found. Check the company name header.".to_string(),
            Self::MasterUpsert { source, .. } => source.user_message(),
        }
    }

    /// Records stored before the failure.
    pub fn committed(&self) -> usize {
        match self {
            Self::PartialImport { committed, .. } => *committed,
            _ => 0,
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
