//! Operations that reach the store: Save Changes and the immediate record
//! operations. Every successful mutation is followed by a full refetch, and
//! an open edit is staged before the store is touched.

use tracing::{Instrument, info, info_span, warn};

use pcell_ingest::parse_column;
use pcell_map::{NormalizeOptions, coerce_text};
use pcell_model::{ColumnKey, FieldValue, PlacementRecord, RecordId, Session};
use pcell_store::{CellUpdate, RecordStore};

use crate::address::{CellAddr, Selection};
use crate::editor::{EditorState, GridEditor};
use crate::error::{GridError, Result};

/// Outcome of a successful Save Changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaveSummary {
    /// Staged cells written.
    pub cells: usize,
    /// Distinct records those cells belong to.
    pub records: usize,
    /// The save committed but the refetch afterwards failed, so the cache
    /// still shows pre-save values.
    pub stale: bool,
}

/// Converts staged text to the value stored for `column`.
pub fn coerce_cell(column: &ColumnKey, text: &str, options: &NormalizeOptions) -> FieldValue {
    match column.field() {
        Some(field) => coerce_text(field.kind(), text, options),
        None => FieldValue::text(text.trim()),
    }
}

impl GridEditor {
    /// Reloads the record cache from the store.
    pub async fn refresh<S: RecordStore>(&mut self, store: &S) -> Result<()> {
        let records = store.select_all().await?;
        info!(records = records.len(), "fetched records");
        self.load_records(records);
        Ok(())
    }

    /// Submits every staged value, including an open edit, as one batch
    /// update. On success the buffer is cleared and the cache refetched; on
    /// failure the buffer is kept. A failed refetch after a committed save is
    /// reported through [`SaveSummary::stale`], not as an error.
    pub async fn save_changes<S: RecordStore>(
        &mut self,
        store: &S,
        options: &NormalizeOptions,
    ) -> Result<SaveSummary> {
        self.commit_draft();
        if self.buffer.is_empty() {
            return Ok(SaveSummary::default());
        }
        let mut summary = SaveSummary {
            cells: self.buffer.len(),
            records: self.buffer.record_count(),
            stale: false,
        };
        let updates: Vec<CellUpdate> = self
            .buffer
            .pending()
            .into_iter()
            .map(|edit| CellUpdate {
                value: coerce_cell(&edit.column, &edit.text, options),
                id: edit.id,
                column: edit.column,
            })
            .collect();

        let span = info_span!("save_changes", cells = summary.cells, records = summary.records);
        if let Err(error) = store.batch_update(&updates).instrument(span).await {
            warn!(error = %error, staged = summary.cells, "save failed; keeping staged edits");
            return Err(error.into());
        }
        self.buffer.clear();
        info!(cells = summary.cells, "saved staged edits");
        if let Err(error) = self.refresh(store).await {
            warn!(error = %error, "saved, but reloading records failed");
            self.state = EditorState::Idle;
            summary.stale = true;
        }
        Ok(summary)
    }

    /// Creates a record from session defaults plus `values`.
    pub async fn add_record<S: RecordStore>(
        &mut self,
        store: &S,
        session: &Session,
        year: i32,
        values: &[(ColumnKey, FieldValue)],
    ) -> Result<PlacementRecord> {
        self.commit_draft();
        let mut record = session.new_record(year);
        for (column, value) in values {
            record.set_cell(column, value.clone());
        }
        let saved = store.insert(record).await?;
        info!(role = session.role.as_str(), "added record");
        self.refresh(store).await?;
        Ok(saved)
    }

    /// Replaces a whole record (edit dialog).
    pub async fn update_record<S: RecordStore>(
        &mut self,
        store: &S,
        record: &PlacementRecord,
    ) -> Result<()> {
        if record.id.is_none() {
            return Err(GridError::MissingRecordId);
        }
        self.commit_draft();
        store.update(record).await?;
        self.refresh(store).await
    }

    pub async fn delete_record<S: RecordStore>(&mut self, store: &S, id: &RecordId) -> Result<()> {
        self.commit_draft();
        store.delete(id).await?;
        self.buffer.forget_record(id);
        self.refresh(store).await
    }

    /// Deletes every record in the current filtered view.
    pub async fn delete_all_filtered<S: RecordStore>(&mut self, store: &S) -> Result<usize> {
        self.commit_draft();
        let ids: Vec<RecordId> = self
            .view_records()
            .into_iter()
            .filter_map(|record| record.id.clone())
            .collect();
        if ids.is_empty() {
            return Ok(0);
        }
        let deleted = store.delete_many(&ids).await?;
        for id in &ids {
            self.buffer.forget_record(id);
        }
        info!(deleted, "deleted filtered records");
        self.state = EditorState::Idle;
        self.refresh(store).await?;
        Ok(deleted)
    }

    /// Adds a custom column and stages one pasted line per view row, from the
    /// selected row (or the first row) downwards, clipped at the last row.
    pub fn paste_as_new_column(&mut self, name: &str, text: &str) -> Result<(ColumnKey, usize)> {
        let start_row = self
            .state
            .selection()
            .map_or(0, |selection| selection.top_left().row);
        let key = self.add_custom_column(name)?;
        let Some(col) = self.view_columns().iter().position(|column| column == &key) else {
            return Ok((key, 0));
        };
        let values = parse_column(text);
        let mut staged = 0usize;
        for (offset, value) in values.iter().enumerate() {
            let row = start_row + offset;
            if row >= self.view_row_count() {
                break;
            }
            if self.stage_cell(CellAddr::new(row, col), value) {
                staged += 1;
            }
        }
        if staged > 0 {
            self.state = EditorState::Selected(Selection::spanning(
                CellAddr::new(start_row, col),
                CellAddr::new(start_row + staged - 1, col),
            ));
        }
        info!(column = %key, staged, "pasted new column");
        Ok((key, staged))
    }
}
