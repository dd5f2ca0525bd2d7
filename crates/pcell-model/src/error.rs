use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid record id: {0:?}")]
    InvalidRecordId(String),
    #[error("column name must not be empty")]
    EmptyColumnName,
    #[error("column already exists: {0}")]
    DuplicateColumn(String),
    #[error("unknown column: {0}")]
    UnknownColumn(String),
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
