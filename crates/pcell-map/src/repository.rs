//! Column layout repository.
//!
//! Layouts are stored as JSON files named `{key}.json` in a base directory.
//! Loading always reconciles the saved layout with the built-in fields, so
//! a layout saved by an older build still lists every current field.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use pcell_model::ColumnSet;

use crate::error::{RepositoryError, Result};

/// Key of the placement records table layout.
pub const PLACEMENT_COLUMNS_KEY: &str = "placement_custom_columns";

#[derive(Debug, Clone)]
pub struct ColumnRepository {
    base_dir: PathBuf,
}

/// A saved layout plus repository metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredColumnLayout {
    pub columns: ColumnSet,
    /// RFC 3339 time of the last save.
    pub saved_at: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl StoredColumnLayout {
    pub fn new(columns: ColumnSet) -> Self {
        Self {
            columns,
            saved_at: Some(chrono::Utc::now().to_rfc3339()),
            version: default_version(),
        }
    }
}

impl ColumnRepository {
    /// Opens a repository, creating the directory if needed.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).map_err(|source| RepositoryError::CreateDir {
            path: base_dir.clone(),
            source,
        })?;
        Ok(Self { base_dir })
    }

    pub fn save(&self, key: &str, columns: &ColumnSet) -> Result<PathBuf> {
        let stored = StoredColumnLayout::new(columns.clone());
        let path = self.layout_path(key);
        let json =
            serde_json::to_string_pretty(&stored).map_err(|source| RepositoryError::Serialize {
                key: key.to_string(),
                source,
            })?;
        fs::write(&path, json).map_err(|source| RepositoryError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(key, path = %path.display(), columns = columns.len(), "saved column layout");
        Ok(path)
    }

    /// Loads a layout merged with the built-in defaults, or `None` if no
    /// layout was saved under `key`.
    pub fn load(&self, key: &str) -> Result<Option<ColumnSet>> {
        let path = self.layout_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path).map_err(|source| RepositoryError::Read {
            path: path.clone(),
            source,
        })?;
        let stored: StoredColumnLayout =
            serde_json::from_str(&contents).map_err(|source| RepositoryError::Parse {
                path: path.clone(),
                source,
            })?;
        Ok(Some(ColumnSet::merge_with_defaults(stored.columns)))
    }

    pub fn load_or_default(&self, key: &str) -> Result<ColumnSet> {
        Ok(self.load(key)?.unwrap_or_default())
    }

    pub fn exists(&self, key: &str) -> bool {
        self.layout_path(key).exists()
    }

    fn layout_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", sanitize_key(key)))
    }
}

/// Makes a layout key safe for use as a file name.
fn sanitize_key(key: &str) -> String {
    key.trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
