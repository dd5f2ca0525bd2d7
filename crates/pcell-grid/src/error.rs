//! Grid editor errors.

use thiserror::Error;

use pcell_map::RepositoryError;
use pcell_model::ModelError;
use pcell_store::StoreError;

#[derive(Debug, Error)]
pub enum GridError {
    /// The store rejected or failed an operation. Staged edits are kept.
    #[error("store operation failed")]
    Store {
        #[source]
        source: StoreError,
    },

    #[error("column layout could not be persisted")]
    Layout {
        #[source]
        source: RepositoryError,
    },

    #[error(transparent)]
    Column(#[from] ModelError),

    #[error("no cell is selected")]
    NoSelection,

    #[error("row {row} is outside the view ({rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("record has no id")]
    MissingRecordId,
}

impl From<StoreError> for GridError {
    fn from(source: StoreError) -> Self {
        Self::Store { source }
    }
}

impl From<RepositoryError> for GridError {
    fn from(source: RepositoryError) -> Self {
        Self::Layout { source }
    }
}

impl GridError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Store { source } => source.user_message(),
            Self::Layout { source } => source.user_message(),
            Self::Column(error) => error.to_string(),
            Self::NoSelection => "Select a cell first.".to_string(),
            Self::RowOutOfRange { row, rows } => {
                format!("Row {} does not exist; the view has {rows} rows.", row + 1)
            }
            Self::MissingRecordId => "This record has not been saved yet.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GridError>;
