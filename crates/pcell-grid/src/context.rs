//! Signed-in application context.
//!
//! Created on start with the caller's [`Session`] and the persisted column
//! layout; torn down on sign-out, which writes the layout back.

use std::path::PathBuf;

use pcell_map::{ColumnRepository, PLACEMENT_COLUMNS_KEY};
use pcell_model::{PlacementRecord, Session, current_year};

use crate::editor::GridEditor;
use crate::error::Result;

#[derive(Debug)]
pub struct AppContext {
    session: Session,
    repository: ColumnRepository,
    editor: GridEditor,
}

impl AppContext {
    /// Loads the saved column layout (merged with the built-in defaults).
    pub fn start(session: Session, repository: ColumnRepository) -> Result<Self> {
        let columns = repository.load_or_default(PLACEMENT_COLUMNS_KEY)?;
        tracing::info!(
            role = session.role.as_str(),
            columns = columns.len(),
            "session started"
        );
        Ok(Self {
            session,
            repository,
            editor: GridEditor::new(columns),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn editor(&self) -> &GridEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut GridEditor {
        &mut self.editor
    }

    /// A blank record with this session's defaults.
    pub fn new_record(&self) -> PlacementRecord {
        self.session.new_record(current_year())
    }

    /// Persists the current column layout.
    pub fn save_layout(&self) -> Result<PathBuf> {
        Ok(self
            .repository
            .save(PLACEMENT_COLUMNS_KEY, self.editor.columns())?)
    }

    /// Persists the layout and ends the session. Staged edits that were never
    /// saved are dropped.
    pub fn sign_out(self) -> Result<PathBuf> {
        let path = self.save_layout()?;
        let dropped = self.editor.buffer().len();
        if dropped > 0 {
            tracing::warn!(dropped, "signed out with unsaved edits");
        }
        tracing::info!(role = self.session.role.as_str(), "session ended");
        Ok(path)
    }
}
