//! Value syntaxes accepted on the command line.
//!
//! Row numbers are 1-based, as printed by `list`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArgError {
    #[error("expected COLUMN=VALUE, got {0:?}")]
    Assignment(String),
    #[error("expected ROW:COLUMN=VALUE, got {0:?}")]
    CellAssignment(String),
    #[error("expected ROW:COLUMN:TO_ROW, got {0:?}")]
    Fill(String),
    #[error("row numbers start at 1, got {0:?}")]
    Row(String),
}

/// `COLUMN=VALUE`. The value may be empty and may contain `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub column: String,
    pub value: String,
}

impl FromStr for Assignment {
    type Err = ArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, value) = s
            .split_once('=')
            .ok_or_else(|| ArgError::Assignment(s.to_string()))?;
        let column = column.trim();
        if column.is_empty() {
            return Err(ArgError::Assignment(s.to_string()));
        }
        Ok(Self {
            column: column.to_string(),
            value: value.to_string(),
        })
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.column, self.value)
    }
}

/// `ROW:COLUMN=VALUE`, addressing one cell of the filtered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellAssignment {
    /// 0-based view row.
    pub row: usize,
    pub column: String,
    pub value: String,
}

impl FromStr for CellAssignment {
    type Err = ArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ArgError::CellAssignment(s.to_string());
        let (row, rest) = s.split_once(':').ok_or_else(invalid)?;
        let Assignment { column, value } = rest.parse().map_err(|_| invalid())?;
        Ok(Self {
            row: parse_row(row)?,
            column,
            value,
        })
    }
}

/// `ROW:COLUMN:TO_ROW`, a drag-fill from one cell down or up to `TO_ROW`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillSpec {
    pub row: usize,
    pub column: String,
    pub to_row: usize,
}

impl FromStr for FillSpec {
    type Err = ArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ArgError::Fill(s.to_string());
        let (row, rest) = s.split_once(':').ok_or_else(invalid)?;
        let (column, to_row) = rest.rsplit_once(':').ok_or_else(invalid)?;
        let column = column.trim();
        if column.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            row: parse_row(row)?,
            column: column.to_string(),
            to_row: parse_row(to_row)?,
        })
    }
}

/// Parses a 1-based row number into a 0-based index.
pub fn parse_row(text: &str) -> Result<usize, ArgError> {
    match text.trim().parse::<usize>() {
        Ok(row) if row > 0 => Ok(row - 1),
        _ => Err(ArgError::Row(text.to_string())),
    }
}

/// Accepts `y` or `yes` in any case.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
