//! In-process store with a call log and scripted failures.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use pcell_model::{MasterCompany, MasterStudent, PlacementRecord, RecordId};

use crate::error::{Result, StoreError};
use crate::state::StoreState;
use crate::store::{CellUpdate, Operation, RecordStore};

/// A logged store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
    /// Which trait method was called.
    pub operation: Operation,
    /// Rows or ids carried by the request.
    pub rows: usize,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
    calls: Mutex<Vec<StoreCall>>,
    /// Operation -> 1-based call numbers that fail.
    failures: Mutex<HashMap<Operation, Vec<usize>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds records; rows without an id get one.
    pub fn with_records(self, records: Vec<PlacementRecord>) -> Self {
        {
            let mut state = lock(&self.state);
            for record in records.into_iter().rev() {
                state.insert(record);
            }
        }
        self
    }

    pub fn with_master_students(self, students: Vec<MasterStudent>) -> Self {
        lock(&self.state).master_students = students;
        self
    }

    pub fn with_master_companies(self, companies: Vec<MasterCompany>) -> Self {
        lock(&self.state).master_companies = companies;
        self
    }

    /// Makes the `call_number`-th call (1-based) of `operation` fail with a
    /// remote error, without touching stored data.
    pub fn fail_on(&self, operation: Operation, call_number: usize) {
        lock(&self.failures)
            .entry(operation)
            .or_default()
            .push(call_number);
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        lock(&self.calls).clone()
    }

    pub fn calls_of(&self, operation: Operation) -> Vec<StoreCall> {
        lock(&self.calls)
            .iter()
            .filter(|call| call.operation == operation)
            .cloned()
            .collect()
    }

    pub fn snapshot(&self) -> StoreState {
        lock(&self.state).clone()
    }

    fn record_call(&self, operation: Operation, rows: usize) -> Result<()> {
        let call_number = {
            let mut calls = lock(&self.calls);
            calls.push(StoreCall { operation, rows });
            calls.iter().filter(|call| call.operation == operation).count()
        };
        let fails = lock(&self.failures)
            .get(&operation)
            .is_some_and(|numbers| numbers.contains(&call_number));
        if fails {
            tracing::debug!(%operation, call_number, "injected store failure");
            return Err(StoreError::Remote {
                operation,
                message: format!("injected failure on call {call_number}"),
            });
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RecordStore for MemoryStore {
    async fn select_all(&self) -> Result<Vec<PlacementRecord>> {
        self.record_call(Operation::SelectAll, 0)?;
        Ok(lock(&self.state).select_all())
    }

    async fn select_by_ids(&self, ids: &[RecordId]) -> Result<Vec<PlacementRecord>> {
        self.record_call(Operation::SelectByIds, ids.len())?;
        Ok(lock(&self.state).select_by_ids(ids))
    }

    async fn insert(&self, record: PlacementRecord) -> Result<PlacementRecord> {
        self.record_call(Operation::Insert, 1)?;
        Ok(lock(&self.state).insert(record))
    }

    async fn update(&self, record: &PlacementRecord) -> Result<()> {
        self.record_call(Operation::Update, 1)?;
        lock(&self.state).update(record)
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        self.record_call(Operation::Delete, 1)?;
        lock(&self.state).delete(id)
    }

    async fn delete_many(&self, ids: &[RecordId]) -> Result<usize> {
        self.record_call(Operation::DeleteMany, ids.len())?;
        Ok(lock(&self.state).delete_many(ids))
    }

    async fn insert_many(&self, records: Vec<PlacementRecord>) -> Result<usize> {
        self.record_call(Operation::InsertMany, records.len())?;
        lock(&self.state).insert_all(Operation::InsertMany, records)
    }

    async fn bulk_insert(&self, records: Vec<PlacementRecord>) -> Result<usize> {
        self.record_call(Operation::BulkInsert, records.len())?;
        lock(&self.state).insert_all(Operation::BulkInsert, records)
    }

    async fn batch_update(&self, updates: &[CellUpdate]) -> Result<usize> {
        self.record_call(Operation::BatchUpdate, updates.len())?;
        lock(&self.state).batch_update(updates)
    }

    async fn master_students(&self, student_ids: &[String]) -> Result<Vec<MasterStudent>> {
        self.record_call(Operation::MasterStudents, student_ids.len())?;
        Ok(lock(&self.state).master_students(student_ids))
    }

    async fn master_companies(&self, names: &[String]) -> Result<Vec<MasterCompany>> {
        self.record_call(Operation::MasterCompanies, names.len())?;
        Ok(lock(&self.state).master_companies(names))
    }

    async fn list_master_students(&self) -> Result<Vec<MasterStudent>> {
        self.record_call(Operation::ListMasterStudents, 0)?;
        Ok(lock(&self.state).list_master_students())
    }

    async fn list_master_companies(&self) -> Result<Vec<MasterCompany>> {
        self.record_call(Operation::ListMasterCompanies, 0)?;
        Ok(lock(&self.state).list_master_companies())
    }

    async fn upsert_master_students(&self, students: Vec<MasterStudent>) -> Result<usize> {
        self.record_call(Operation::UpsertMasterStudents, students.len())?;
        lock(&self.state).upsert_master_students(students)
    }

    async fn upsert_master_companies(&self, companies: Vec<MasterCompany>) -> Result<usize> {
        self.record_call(Operation::UpsertMasterCompanies, companies.len())?;
        lock(&self.state).upsert_master_companies(companies)
    }

    async fn delete_master_students(&self, student_ids: &[String]) -> Result<usize> {
        self.record_call(Operation::DeleteMasterStudents, student_ids.len())?;
        Ok(lock(&self.state).delete_master_students(student_ids))
    }

    async fn delete_master_companies(&self, names: &[String]) -> Result<usize> {
        self.record_call(Operation::DeleteMasterCompanies, names.len())?;
        Ok(lock(&self.state).delete_master_companies(names))
    }
}
