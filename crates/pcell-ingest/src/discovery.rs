//! Expanding import paths into spreadsheet files.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};
use crate::workbook::is_spreadsheet;

/// Lists spreadsheet files directly inside `dir`, sorted by file name.
/// Lock files left behind by office suites (`~$name.xlsx`) are ignored.
pub fn list_sheet_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() || !is_spreadsheet(&path) {
            continue;
        }
        let is_lock_file = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("~$"));
        if !is_lock_file {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Expands directories to the spreadsheets they contain; files pass through
/// in the given order.
pub fn expand_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(list_sheet_files(path)?);
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            return Err(IngestError::FileNotFound { path: path.clone() });
        }
    }
    Ok(files)
}
