//! Column filters and global search over the record cache.
//!
//! Everything here is a pure function of the records, the active
//! [`FilterSet`] and the visible columns; the editor recomputes the view
//! after every change.

use std::collections::BTreeSet;
use std::fmt;

use pcell_model::{ColumnKey, PlacementRecord};

/// How a column filter value is compared with a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Case-insensitive substring containment.
    #[default]
    Contains,
    /// Case-insensitive equality of the trimmed text.
    Exact,
}

impl MatchMode {
    pub fn matches(self, cell: &str, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return true;
        }
        let cell = cell.trim().to_lowercase();
        let value = value.to_lowercase();
        match self {
            Self::Contains => cell.contains(&value),
            Self::Exact => cell == value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriterion {
    pub id: u32,
    pub column: ColumnKey,
    /// Column label at the time the filter was added.
    pub label: String,
    pub value: String,
}

/// Active column filters plus the global search text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    criteria: Vec<FilterCriterion>,
    search: String,
    mode: MatchMode,
    next_id: u32,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Adds a criterion and returns its id.
    pub fn add(
        &mut self,
        column: ColumnKey,
        label: impl Into<String>,
        value: impl Into<String>,
    ) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.criteria.push(FilterCriterion {
            id,
            column,
            label: label.into(),
            value: value.into(),
        });
        id
    }

    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.criteria.len();
        self.criteria.retain(|criterion| criterion.id != id);
        self.criteria.len() != before
    }

    /// Drops every criterion and the search text.
    pub fn clear(&mut self) {
        self.criteria.clear();
        self.search.clear();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_mode(&mut self, mode: MatchMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn criteria(&self) -> &[FilterCriterion] {
        &self.criteria
    }

    /// True when nothing constrains the view.
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty()
            && self
                .criteria
                .iter()
                .all(|criterion| criterion.value.trim().is_empty())
    }

    pub fn matches(&self, record: &PlacementRecord, visible: &[ColumnKey]) -> bool {
        let columns_pass = self.criteria.iter().all(|criterion| {
            self.mode
                .matches(&record.cell_text(&criterion.column), &criterion.value)
        });
        columns_pass && search_matches(record, &self.search, visible)
    }
}

/// Whether any visible column contains `search` (case-insensitive).
pub fn search_matches(record: &PlacementRecord, search: &str, visible: &[ColumnKey]) -> bool {
    let search = search.trim();
    if search.is_empty() {
        return true;
    }
    visible
        .iter()
        .any(|column| MatchMode::Contains.matches(&record.cell_text(column), search))
}

/// Indices of `records` passing every filter, in record order.
pub fn apply(records: &[PlacementRecord], filters: &FilterSet, visible: &[ColumnKey]) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| filters.matches(record, visible))
        .map(|(index, _)| index)
        .collect()
}

/// Distinct non-empty values of `column` across `rows`, sorted for a picker.
pub fn available_values(
    records: &[PlacementRecord],
    rows: &[usize],
    column: &ColumnKey,
) -> Vec<String> {
    let values: BTreeSet<String> = rows
        .iter()
        .filter_map(|&index| records.get(index))
        .map(|record| record.cell_text(column).trim().to_string())
        .filter(|value| !value.is_empty())
        .collect();
    let mut values: Vec<String> = values.into_iter().collect();
    values.sort_by_key(|value| value.to_lowercase());
    values
}

/// Visible columns with a value in every one of `rows`.
pub fn strict_columns(
    records: &[PlacementRecord],
    rows: &[usize],
    visible: &[ColumnKey],
) -> Vec<ColumnKey> {
    visible
        .iter()
        .filter(|column| {
            rows.iter()
                .filter_map(|&index| records.get(index))
                .all(|record| record.is_cell_filled(column))
        })
        .cloned()
        .collect()
}

/// "Showing X of Y records".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCount {
    pub shown: usize,
    pub total: usize,
}

impl fmt::Display for RowCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Showing {} of {} records", self.shown, self.total)
    }
}
