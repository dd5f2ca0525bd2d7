//! Spreadsheet-style editing over the filtered record view.
//!
//! # Architecture
//!
//! The editor owns the record cache, the column layout, the active filters
//! and the [`EditBuffer`]. Interaction is a small state machine:
//!
//! ```text
//! Idle ──click/arrow──▶ Selected ──Enter/char/double-click──▶ Editing
//!                          │  ▲                                  │
//!                          │  └──────Enter/Tab/Escape────────────┘
//!                          └──fill handle──▶ DragFilling ──release──▶ Selected
//! ```
//!
//! Typing, paste, drag-fill and Delete only ever write to the buffer; the
//! store is touched by [`GridEditor::save_changes`] and the immediate record
//! operations in [`crate::commit`]. Any change to filters, search or column
//! visibility, and every record refetch, returns the machine to `Idle`
//! because cell addresses are relative to the view.

use pcell_ingest::{split_matrix, to_tsv};
use pcell_model::{ColumnKey, ColumnSet, ModelError, PlacementRecord, RecordId};

use crate::address::{CellAddr, Selection};
use crate::buffer::EditBuffer;
use crate::error::{GridError, Result};
use crate::filter::{self, FilterSet, MatchMode, RowCount};

// ============================================================================
// Input
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Tab,
    Enter,
    Escape,
    Delete,
    Backspace,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false };
    pub const SHIFT: Self = Self { shift: true };
}

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorState {
    /// Nothing selected.
    #[default]
    Idle,
    Selected(Selection),
    /// A text input has taken over `cell`.
    Editing { cell: CellAddr, draft: String },
    /// The fill handle of `source` is being dragged to `to_row`.
    DragFilling { source: CellAddr, to_row: usize },
}

impl EditorState {
    pub fn selection(&self) -> Option<Selection> {
        match self {
            Self::Idle => None,
            Self::Selected(selection) => Some(*selection),
            Self::Editing { cell, .. } => Some(Selection::single(*cell)),
            Self::DragFilling { source, to_row } => Some(Selection::spanning(
                *source,
                CellAddr::new(*to_row, source.col),
            )),
        }
    }
}

// ============================================================================
// Editor
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct GridEditor {
    pub(crate) records: Vec<PlacementRecord>,
    pub(crate) columns: ColumnSet,
    pub(crate) filters: FilterSet,
    pub(crate) strict_view: bool,
    /// Indices into `records` of the filtered rows.
    pub(crate) rows: Vec<usize>,
    pub(crate) visible: Vec<ColumnKey>,
    pub(crate) buffer: EditBuffer,
    pub(crate) state: EditorState,
}

impl GridEditor {
    pub fn new(columns: ColumnSet) -> Self {
        let mut editor = Self {
            columns,
            ..Self::default()
        };
        editor.rebuild_view();
        editor
    }

    pub fn with_records(mut self, records: Vec<PlacementRecord>) -> Self {
        self.load_records(records);
        self
    }

    /// Replaces the record cache (after a fetch). An open edit is staged
    /// against the record it was opened on, then the selection is cleared:
    /// rows may have moved, so old cell addresses no longer name the same
    /// records.
    pub fn load_records(&mut self, records: Vec<PlacementRecord>) {
        self.commit_draft();
        self.records = records;
        self.rebuild_view();
        self.state = EditorState::Idle;
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn records(&self) -> &[PlacementRecord] {
        &self.records
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_strict_view(&self) -> bool {
        self.strict_view
    }

    /// Columns currently rendered, left to right.
    pub fn view_columns(&self) -> &[ColumnKey] {
        &self.visible
    }

    pub fn view_row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row_count(&self) -> RowCount {
        RowCount {
            shown: self.rows.len(),
            total: self.records.len(),
        }
    }

    /// Filtered records in view order.
    pub fn view_records(&self) -> Vec<&PlacementRecord> {
        self.rows
            .iter()
            .filter_map(|&index| self.records.get(index))
            .collect()
    }

    pub fn record_at(&self, row: usize) -> Option<&PlacementRecord> {
        self.rows.get(row).and_then(|&index| self.records.get(index))
    }

    pub fn column_at(&self, col: usize) -> Option<&ColumnKey> {
        self.visible.get(col)
    }

    /// The rendered text of a cell: staged value first, then the stored one.
    pub fn display_text(&self, cell: CellAddr) -> Option<String> {
        let record = self.record_at(cell.row)?;
        let column = self.column_at(cell.col)?;
        if let Some(id) = &record.id
            && let Some(staged) = self.buffer.get(id, column)
        {
            return Some(staged.to_string());
        }
        Some(record.cell_text(column))
    }

    /// Distinct values of `column` across the filtered rows.
    pub fn available_values(&self, column: &ColumnKey) -> Vec<String> {
        filter::available_values(&self.records, &self.rows, column)
    }

    // ------------------------------------------------------------------------
    // Filters and columns (each resets the selection)
    // ------------------------------------------------------------------------

    pub fn add_filter(&mut self, column: &ColumnKey, value: impl Into<String>) -> Result<u32> {
        let label = self
            .columns
            .get(column)
            .map(|definition| definition.label.clone())
            .ok_or_else(|| ModelError::UnknownColumn(column.to_string()))?;
        let id = self.filters.add(column.clone(), label, value);
        self.view_changed();
        Ok(id)
    }

    pub fn remove_filter(&mut self, id: u32) -> bool {
        let removed = self.filters.remove(id);
        self.view_changed();
        removed
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.view_changed();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters.set_search(search);
        self.view_changed();
    }

    pub fn set_match_mode(&mut self, mode: MatchMode) {
        self.filters.set_mode(mode);
        self.view_changed();
    }

    /// Shows only columns filled in every filtered row.
    pub fn set_strict_view(&mut self, strict: bool) {
        self.strict_view = strict;
        self.view_changed();
    }

    pub fn hide_column(&mut self, column: &ColumnKey) -> Result<()> {
        self.columns.hide(column)?;
        self.view_changed();
        Ok(())
    }

    pub fn unhide_column(&mut self, column: &ColumnKey) -> Result<()> {
        self.columns.unhide(column)?;
        self.view_changed();
        Ok(())
    }

    pub fn add_custom_column(&mut self, name: &str) -> Result<ColumnKey> {
        let key = self.columns.add_custom(name)?;
        self.view_changed();
        Ok(key)
    }

    pub fn rename_column(&mut self, column: &ColumnKey, label: &str) -> Result<()> {
        self.columns.rename(column, label)?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------------

    /// Selects `cell`, or extends the selection to it with Shift. An open
    /// edit is committed to the buffer first.
    pub fn click(&mut self, cell: CellAddr, modifiers: Modifiers) -> bool {
        if !self.in_view(cell) {
            return false;
        }
        self.commit_draft();
        self.state = match (&self.state, modifiers.shift) {
            (EditorState::Selected(selection), true) => {
                EditorState::Selected(Selection::spanning(selection.anchor, cell))
            }
            _ => EditorState::Selected(Selection::single(cell)),
        };
        true
    }

    pub fn double_click(&mut self, cell: CellAddr) -> bool {
        if !self.click(cell, Modifiers::NONE) {
            return false;
        }
        self.begin_edit(cell, None);
        true
    }

    /// Grabs the fill handle of the focused cell.
    pub fn begin_fill(&mut self) -> bool {
        let EditorState::Selected(selection) = &self.state else {
            return false;
        };
        let source = selection.focus;
        self.state = EditorState::DragFilling {
            source,
            to_row: source.row,
        };
        true
    }

    /// Moves the fill handle; the column never changes.
    pub fn drag_to(&mut self, row: usize) -> bool {
        let last = self.rows.len().saturating_sub(1);
        match &mut self.state {
            EditorState::DragFilling { to_row, .. } => {
                *to_row = row.min(last);
                true
            }
            _ => false,
        }
    }

    /// Copies the source value into every row between the source and the
    /// release row, in either direction. Returns the number of cells staged.
    pub fn release_fill(&mut self) -> usize {
        let EditorState::DragFilling { source, to_row } = self.state.clone() else {
            return 0;
        };
        let value = self.display_text(source).unwrap_or_default();
        let targets: Vec<usize> = if to_row >= source.row {
            (source.row + 1..=to_row).collect()
        } else {
            (to_row..source.row).collect()
        };
        let staged = targets
            .into_iter()
            .filter(|&row| self.stage_cell(CellAddr::new(row, source.col), &value))
            .count();
        self.state = EditorState::Selected(Selection::spanning(
            source,
            CellAddr::new(to_row, source.col),
        ));
        tracing::debug!(staged, "drag fill");
        staged
    }

    // ------------------------------------------------------------------------
    // Keyboard input
    // ------------------------------------------------------------------------

    /// Applies a key press; returns whether it changed anything.
    pub fn handle_key(&mut self, key: Key, modifiers: Modifiers) -> bool {
        match self.state.clone() {
            EditorState::Idle => self.key_idle(key),
            EditorState::Selected(selection) => self.key_selected(selection, key, modifiers),
            EditorState::Editing { cell, draft } => self.key_editing(cell, draft, key, modifiers),
            EditorState::DragFilling { source, .. } => {
                if key == Key::Escape {
                    self.state = EditorState::Selected(Selection::single(source));
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Replaces the text of the open edit.
    pub fn set_draft(&mut self, text: impl Into<String>) -> bool {
        match &mut self.state {
            EditorState::Editing { draft, .. } => {
                *draft = text.into();
                true
            }
            _ => false,
        }
    }

    fn key_idle(&mut self, key: Key) -> bool {
        let navigates = matches!(
            key,
            Key::Up | Key::Down | Key::Left | Key::Right | Key::Tab | Key::Enter
        );
        if navigates && !self.rows.is_empty() && !self.visible.is_empty() {
            self.state = EditorState::Selected(Selection::single(CellAddr::new(0, 0)));
            return true;
        }
        false
    }

    fn key_selected(&mut self, selection: Selection, key: Key, modifiers: Modifiers) -> bool {
        match key {
            Key::Up | Key::Down | Key::Left | Key::Right => {
                let focus = self.step(selection.focus, key);
                self.state = if modifiers.shift {
                    EditorState::Selected(Selection::spanning(selection.anchor, focus))
                } else {
                    EditorState::Selected(Selection::single(focus))
                };
                true
            }
            Key::Tab => {
                let direction = if modifiers.shift { Key::Left } else { Key::Right };
                let focus = self.step(selection.focus, direction);
                self.state = EditorState::Selected(Selection::single(focus));
                true
            }
            Key::Enter => {
                self.begin_edit(selection.focus, None);
                true
            }
            Key::Char(c) if !c.is_control() => {
                self.begin_edit(selection.focus, Some(c));
                true
            }
            Key::Delete | Key::Backspace => self.delete_selection() > 0,
            Key::Escape => {
                self.state = EditorState::Idle;
                true
            }
            Key::Char(_) => false,
        }
    }

    fn key_editing(&mut self, cell: CellAddr, mut draft: String, key: Key, modifiers: Modifiers) -> bool {
        match key {
            Key::Char(c) if !c.is_control() => {
                draft.push(c);
                self.state = EditorState::Editing { cell, draft };
                true
            }
            Key::Backspace => {
                draft.pop();
                self.state = EditorState::Editing { cell, draft };
                true
            }
            Key::Enter => {
                self.stage_draft(cell, &draft);
                let next = self.step(cell, Key::Down);
                self.state = EditorState::Selected(Selection::single(next));
                true
            }
            Key::Tab => {
                self.stage_draft(cell, &draft);
                let direction = if modifiers.shift { Key::Left } else { Key::Right };
                let next = self.step(cell, direction);
                self.state = EditorState::Selected(Selection::single(next));
                true
            }
            Key::Escape => {
                self.state = EditorState::Selected(Selection::single(cell));
                true
            }
            _ => false,
        }
    }

    // ------------------------------------------------------------------------
    // Clipboard and bulk staging
    // ------------------------------------------------------------------------

    /// The selected rectangle as tab/newline text, staged values first.
    pub fn copy(&self) -> Option<String> {
        let selection = self.state.selection()?;
        let (top, bottom) = (selection.top_left(), selection.bottom_right());
        let matrix: Vec<Vec<String>> = (top.row..=bottom.row)
            .map(|row| {
                (top.col..=bottom.col)
                    .map(|col| self.display_text(CellAddr::new(row, col)).unwrap_or_default())
                    .collect()
            })
            .collect();
        Some(to_tsv(&matrix))
    }

    /// Writes clipboard text into the buffer from the selection's top-left
    /// cell, clipped at the view edges. Returns the number of cells staged.
    pub fn paste(&mut self, text: &str) -> Result<usize> {
        let EditorState::Selected(selection) = &self.state else {
            return Err(GridError::NoSelection);
        };
        let origin = selection.top_left();
        let matrix = split_matrix(text);
        let mut staged = 0usize;
        let mut extent = origin;
        for (dr, values) in matrix.iter().enumerate() {
            for (dc, value) in values.iter().enumerate() {
                let cell = CellAddr::new(origin.row + dr, origin.col + dc);
                if self.in_view(cell) && self.stage_cell(cell, value) {
                    staged += 1;
                    extent = CellAddr::new(extent.row.max(cell.row), extent.col.max(cell.col));
                }
            }
        }
        self.state = EditorState::Selected(Selection::spanning(origin, extent));
        tracing::debug!(staged, rows = matrix.len(), "pasted into buffer");
        Ok(staged)
    }

    /// Stages an empty value for every selected cell.
    pub fn delete_selection(&mut self) -> usize {
        let Some(selection) = self.state.selection() else {
            return 0;
        };
        selection
            .cells()
            .filter(|&cell| self.stage_cell(cell, ""))
            .count()
    }

    /// Drops every staged value; returns how many were dropped.
    pub fn discard_changes(&mut self) -> usize {
        let dropped = self.buffer.len();
        self.buffer.clear();
        if let EditorState::Editing { cell, .. } = self.state {
            self.state = EditorState::Selected(Selection::single(cell));
        }
        tracing::info!(dropped, "discarded staged edits");
        dropped
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    pub(crate) fn rebuild_view(&mut self) {
        let visible = self.columns.visible_keys();
        self.rows = filter::apply(&self.records, &self.filters, &visible);
        self.visible = if self.strict_view {
            filter::strict_columns(&self.records, &self.rows, &visible)
        } else {
            visible
        };
    }

    fn view_changed(&mut self) {
        self.rebuild_view();
        self.state = EditorState::Idle;
    }

    fn in_view(&self, cell: CellAddr) -> bool {
        cell.row < self.rows.len() && cell.col < self.visible.len()
    }

    fn step(&self, cell: CellAddr, key: Key) -> CellAddr {
        let last_row = self.rows.len().saturating_sub(1);
        let last_col = self.visible.len().saturating_sub(1);
        match key {
            Key::Up => CellAddr::new(cell.row.saturating_sub(1), cell.col),
            Key::Down => CellAddr::new((cell.row + 1).min(last_row), cell.col),
            Key::Left => CellAddr::new(cell.row, cell.col.saturating_sub(1)),
            Key::Right => CellAddr::new(cell.row, (cell.col + 1).min(last_col)),
            _ => cell,
        }
    }

    fn begin_edit(&mut self, cell: CellAddr, first: Option<char>) {
        let draft = match first {
            Some(c) => c.to_string(),
            None => self.display_text(cell).unwrap_or_default(),
        };
        self.state = EditorState::Editing { cell, draft };
    }

    /// Stages the open edit, if any, and keeps its cell selected.
    pub(crate) fn commit_draft(&mut self) {
        if let EditorState::Editing { cell, draft } = self.state.clone() {
            self.stage_draft(cell, &draft);
            self.state = EditorState::Selected(Selection::single(cell));
        }
    }

    /// Unchanged drafts are not staged.
    fn stage_draft(&mut self, cell: CellAddr, draft: &str) {
        if self.display_text(cell).as_deref() != Some(draft) {
            self.stage_cell(cell, draft);
        }
    }

    pub(crate) fn stage_cell(&mut self, cell: CellAddr, text: &str) -> bool {
        let Some((id, column)) = self.cell_target(cell) else {
            return false;
        };
        self.buffer.stage(&id, &column, text);
        true
    }

    fn cell_target(&self, cell: CellAddr) -> Option<(RecordId, ColumnKey)> {
        let id = self.record_at(cell.row)?.id.clone()?;
        let column = self.column_at(cell.col)?.clone();
        Some((id, column))
    }
}
