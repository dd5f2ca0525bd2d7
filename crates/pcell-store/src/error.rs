//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

use pcell_model::RecordId;

use crate::store::Operation;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found: {id}")]
    NotFound { id: RecordId },

    /// The backend refused the request as a whole.
    #[error("{operation} rejected: {reason}")]
    Rejected {
        operation: Operation,
        reason: String,
    },

    /// The backend could not be reached or failed mid-request.
    #[error("{operation} failed: {message}")]
    Remote {
        operation: Operation,
        message: String,
    },

    #[error("failed to {operation} store file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse store file: {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize store snapshot")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to complete store write")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("background write task failed: {message}")]
    Task { message: String },
}

impl StoreError {
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { .. } => {
                "The record no longer exists. Refresh and try again.".to_string()
            }
            Self::Rejected { reason, .. } => format!("The server rejected the change: {reason}"),
            Self::Remote { message, .. } => format!("The server request failed: {message}"),
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the data file at {}", operation, path.display()),
            Self::Parse { path, .. } => {
                format!("The data file at {} is damaged.", path.display())
            }
            Self::Serialization { .. } | Self::Task { .. } => {
                "The data could not be saved.".to_string()
            }
            Self::AtomicWriteFailed { target_path, .. } => {
                format!("Could not finish saving {}", target_path.display())
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
