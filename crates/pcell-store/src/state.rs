//! Backend-independent record table shared by the bundled stores.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use pcell_model::{MasterCompany, MasterStudent, PlacementRecord, RecordId, master_key};

use crate::error::{Result, StoreError};
use crate::store::{CellUpdate, Operation};

/// Records (newest first) plus master reference data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreState {
    pub records: Vec<PlacementRecord>,
    pub master_students: Vec<MasterStudent>,
    pub master_companies: Vec<MasterCompany>,
}

impl StoreState {
    pub fn select_all(&self) -> Vec<PlacementRecord> {
        self.records.clone()
    }

    pub fn select_by_ids(&self, ids: &[RecordId]) -> Vec<PlacementRecord> {
        self.records
            .iter()
            .filter(|record| record.id.as_ref().is_some_and(|id| ids.contains(id)))
            .cloned()
            .collect()
    }

    pub fn insert(&mut self, mut record: PlacementRecord) -> PlacementRecord {
        if record.id.is_none() {
            record.id = Some(RecordId::generate());
        }
        self.records.insert(0, record.clone());
        record
    }

    /// Validates every row first so a rejected call stores nothing.
    pub fn insert_all(
        &mut self,
        operation: Operation,
        records: Vec<PlacementRecord>,
    ) -> Result<usize> {
        if let Some(index) = records.iter().position(|record| !record.has_identity()) {
            return Err(StoreError::Rejected {
                operation,
                reason: format!("row {} has no student name", index + 1),
            });
        }
        let count = records.len();
        for record in records {
            self.insert(record);
        }
        Ok(count)
    }

    pub fn update(&mut self, record: &PlacementRecord) -> Result<()> {
        let id = record.id.clone().ok_or_else(|| StoreError::Rejected {
            operation: Operation::Update,
            reason: "record has no id".to_string(),
        })?;
        let slot = self.find_mut(&id)?;
        *slot = record.clone();
        Ok(())
    }

    pub fn delete(&mut self, id: &RecordId) -> Result<()> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound { id: id.clone() })?;
        self.records.remove(index);
        Ok(())
    }

    pub fn delete_many(&mut self, ids: &[RecordId]) -> usize {
        let before = self.records.len();
        self.records
            .retain(|record| !record.id.as_ref().is_some_and(|id| ids.contains(id)));
        before - self.records.len()
    }

    /// Applies every update or none: unknown ids fail the whole batch.
    pub fn batch_update(&mut self, updates: &[CellUpdate]) -> Result<usize> {
        if let Some(missing) = updates.iter().find(|update| self.position(&update.id).is_none()) {
            return Err(StoreError::NotFound {
                id: missing.id.clone(),
            });
        }
        for update in updates {
            let record = self.find_mut(&update.id)?;
            record.set_cell(&update.column, update.value.clone());
        }
        Ok(updates.len())
    }

    pub fn master_students(&self, student_ids: &[String]) -> Vec<MasterStudent> {
        let keys = key_set(student_ids);
        self.master_students
            .iter()
            .filter(|student| keys.contains(&student.key()))
            .cloned()
            .collect()
    }

    pub fn master_companies(&self, names: &[String]) -> Vec<MasterCompany> {
        let keys = key_set(names);
        self.master_companies
            .iter()
            .filter(|company| keys.contains(&company.key()))
            .cloned()
            .collect()
    }

    pub fn list_master_students(&self) -> Vec<MasterStudent> {
        let mut students = self.master_students.clone();
        students.sort_by_key(MasterStudent::key);
        students
    }

    pub fn list_master_companies(&self) -> Vec<MasterCompany> {
        let mut companies = self.master_companies.clone();
        companies.sort_by_key(MasterCompany::key);
        companies
    }

    /// Rows with a blank id reject the whole call.
    pub fn upsert_master_students(&mut self, students: Vec<MasterStudent>) -> Result<usize> {
        if let Some(index) = students.iter().position(|s| s.key().is_empty()) {
            return Err(StoreError::Rejected {
                operation: Operation::UpsertMasterStudents,
                reason: format!("row {} has no student id", index + 1),
            });
        }
        let count = students.len();
        for student in students {
            upsert_by_key(&mut self.master_students, student, MasterStudent::key);
        }
        Ok(count)
    }

    /// Rows with a blank name reject the whole call.
    pub fn upsert_master_companies(&mut self, companies: Vec<MasterCompany>) -> Result<usize> {
        if let Some(index) = companies.iter().position(|c| c.key().is_empty()) {
            return Err(StoreError::Rejected {
                operation: Operation::UpsertMasterCompanies,
                reason: format!("row {} has no company name", index + 1),
            });
        }
        let count = companies.len();
        for company in companies {
            upsert_by_key(&mut self.master_companies, company, MasterCompany::key);
        }
        Ok(count)
    }

    pub fn delete_master_students(&mut self, student_ids: &[String]) -> usize {
        let keys = key_set(student_ids);
        let before = self.master_students.len();
        self.master_students
            .retain(|student| !keys.contains(&student.key()));
        before - self.master_students.len()
    }

    pub fn delete_master_companies(&mut self, names: &[String]) -> usize {
        let keys = key_set(names);
        let before = self.master_companies.len();
        self.master_companies
            .retain(|company| !keys.contains(&company.key()));
        before - self.master_companies.len()
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.id.as_ref() == Some(id))
    }

    fn find_mut(&mut self, id: &RecordId) -> Result<&mut PlacementRecord> {
        self.records
            .iter_mut()
            .find(|record| record.id.as_ref() == Some(id))
            .ok_or_else(|| StoreError::NotFound { id: id.clone() })
    }
}

fn key_set(values: &[String]) -> BTreeSet<String> {
    values
        .iter()
        .map(|value| master_key(value))
        .filter(|key| !key.is_empty())
        .collect()
}

/// Replaces the row with the same key in place, or appends.
fn upsert_by_key<T>(rows: &mut Vec<T>, row: T, key: impl Fn(&T) -> String) {
    let wanted = key(&row);
    match rows.iter_mut().find(|existing| key(existing) == wanted) {
        Some(slot) => *slot = row,
        None => rows.push(row),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcell_model::{ColumnKey, FieldKey, FieldValue};

    fn named(name: &str) -> PlacementRecord {
        let mut record = PlacementRecord::blank(2024);
        record.student_name = name.to_string();
        record
    }

    #[test]
    fn inserts_are_newest_first() {
        let mut state = StoreState::default();
        state
            .insert_all(Operation::InsertMany, vec![named("a"), named("b")])
            .expect("insert");
        let names: Vec<_> = state.select_all().into_iter().map(|r| r.student_name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn rejected_insert_stores_nothing() {
        let mut state = StoreState::default();
        let result = state.insert_all(Operation::BulkInsert, vec![named("a"), named(" ")]);
        assert!(matches!(result, Err(StoreError::Rejected { .. })));
        assert!(state.records.is_empty());
    }

    #[test]
    fn batch_update_is_all_or_nothing() {
        let mut state = StoreState::default();
        let saved = state.insert(named("a"));
        let id = saved.id.clone().expect("id");
        let missing = RecordId::new("missing").expect("id");
        let column = ColumnKey::BuiltIn(FieldKey::Department);
        let updates = vec![
            CellUpdate { id: id.clone(), column: column.clone(), value: FieldValue::text("CSE") },
            CellUpdate { id: missing, column, value: FieldValue::text("ECE") },
        ];
        assert!(state.batch_update(&updates).is_err());
        assert_eq!(state.records[0].department, "");
        assert_eq!(state.batch_update(&updates[..1]).expect("update"), 1);
        assert_eq!(state.records[0].department, "CSE");
    }

    fn student(id: &str, name: &str) -> MasterStudent {
        MasterStudent {
            student_id: id.to_string(),
            student_name: name.to_string(),
            ..MasterStudent::default()
        }
    }

    #[test]
    fn master_upsert_replaces_by_key() {
        let mut state = StoreState::default();
        state
            .upsert_master_students(vec![student("1XX001", "Asha"), student("1XX002", "Ravi")])
            .expect("upsert");
        state
            .upsert_master_students(vec![student(" 1xx001 ", "Asha K")])
            .expect("upsert");
        let names: Vec<_> = state
            .list_master_students()
            .into_iter()
            .map(|s| s.student_name)
            .collect();
        assert_eq!(names, vec!["Asha K", "Ravi"]);

        let rejected = state.upsert_master_students(vec![student("1XX003", "Meera"), student("", "x")]);
        assert!(matches!(rejected, Err(StoreError::Rejected { .. })));
        assert_eq!(state.master_students.len(), 2);

        assert_eq!(state.delete_master_students(&["1XX002".to_string(), "nope".to_string()]), 1);
        assert_eq!(state.master_students.len(), 1);
    }
}
