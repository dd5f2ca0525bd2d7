//! Local edit buffer: staged cell text waiting for Save Changes.

use std::collections::BTreeMap;

use pcell_model::{ColumnKey, RecordId};

/// Pending text per `(record, column)`; the latest write wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    pending: BTreeMap<RecordId, BTreeMap<ColumnKey, String>>,
}

/// One staged value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    pub id: RecordId,
    pub column: ColumnKey,
    pub text: String,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&mut self, id: &RecordId, column: &ColumnKey, text: impl Into<String>) {
        self.pending
            .entry(id.clone())
            .or_default()
            .insert(column.clone(), text.into());
    }

    pub fn get(&self, id: &RecordId, column: &ColumnKey) -> Option<&str> {
        self.pending
            .get(id)
            .and_then(|columns| columns.get(column))
            .map(String::as_str)
    }

    pub fn contains(&self, id: &RecordId, column: &ColumnKey) -> bool {
        self.get(id, column).is_some()
    }

    /// Number of staged cells.
    pub fn len(&self) -> usize {
        self.pending.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of records with at least one staged cell.
    pub fn record_count(&self) -> usize {
        self.pending.len()
    }

    /// Drops everything staged for `id`.
    pub fn forget_record(&mut self, id: &RecordId) -> bool {
        self.pending.remove(id).is_some()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Staged values in record then column order.
    pub fn pending(&self) -> Vec<PendingEdit> {
        self.pending
            .iter()
            .flat_map(|(id, columns)| {
                columns.iter().map(move |(column, text)| PendingEdit {
                    id: id.clone(),
                    column: column.clone(),
                    text: text.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcell_model::FieldKey;

    fn id(value: &str) -> RecordId {
        RecordId::new(value).expect("valid id")
    }

    #[test]
    fn latest_write_wins() {
        let mut buffer = EditBuffer::new();
        let dept = ColumnKey::BuiltIn(FieldKey::Department);
        buffer.stage(&id("a"), &dept, "CSE");
        buffer.stage(&id("a"), &dept, "ECE");
        buffer.stage(&id("b"), &dept, "");
        assert_eq!(buffer.get(&id("a"), &dept), Some("ECE"));
        assert_eq!(buffer.get(&id("b"), &dept), Some(""));
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.record_count(), 2);

        assert!(buffer.forget_record(&id("a")));
        assert_eq!(buffer.pending().len(), 1);
        buffer.clear();
        assert!(buffer.is_empty());
    }
}
