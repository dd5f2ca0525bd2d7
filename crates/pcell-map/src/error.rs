//! Error types for column layout storage.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("failed to create column layout directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read column layout {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write column layout {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse column layout {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize column layout {key}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RepositoryError {
    /// Notification text for the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::CreateDir { path, .. } => {
                format!("Could not create the settings folder {}.", path.display())
            }
            Self::Read { path, .. } | Self::Parse { path, .. } => {
                format!("Saved column settings in {} could not be loaded.", path.display())
            }
            Self::Write { path, .. } => {
                format!("Column settings could not be saved to {}.", path.display())
            }
            Self::Serialize { .. } => "Column settings could not be saved.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
