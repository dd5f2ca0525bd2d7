//! The record store collaborator.

use std::fmt;

use pcell_model::{
    ColumnKey, FieldValue, MasterCompany, MasterStudent, PlacementRecord, RecordId,
};

use crate::error::Result;

/// One staged cell edit submitted through [`RecordStore::batch_update`].
#[derive(Debug, Clone, PartialEq)]
pub struct CellUpdate {
    pub id: RecordId,
    /// Built-in field, or an `other_details` key for custom columns.
    pub column: ColumnKey,
    pub value: FieldValue,
}

/// Store operations, used for logging and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SelectAll,
    SelectByIds,
    Insert,
    Update,
    Delete,
    DeleteMany,
    InsertMany,
    BulkInsert,
    BatchUpdate,
    MasterStudents,
    MasterCompanies,
    ListMasterStudents,
    ListMasterCompanies,
    UpsertMasterStudents,
    UpsertMasterCompanies,
    DeleteMasterStudents,
    DeleteMasterCompanies,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SelectAll => "select_all",
            Self::SelectByIds => "select_by_ids",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::DeleteMany => "delete_many",
            Self::InsertMany => "insert_many",
            Self::BulkInsert => "bulk_insert",
            Self::BatchUpdate => "batch_update",
            Self::MasterStudents => "master_students",
            Self::MasterCompanies => "master_companies",
            Self::ListMasterStudents => "list_master_students",
            Self::ListMasterCompanies => "list_master_companies",
            Self::UpsertMasterStudents => "upsert_master_students",
            Self::UpsertMasterCompanies => "upsert_master_companies",
            Self::DeleteMasterStudents => "delete_master_students",
            Self::DeleteMasterCompanies => "delete_master_companies",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistence backend for placement records.
///
/// The store is the source of truth: callers refetch after every mutation
/// instead of patching their local copy.
#[allow(async_fn_in_trait)]
pub trait RecordStore {
    /// Every record, newest first.
    async fn select_all(&self) -> Result<Vec<PlacementRecord>>;

    async fn select_by_ids(&self, ids: &[RecordId]) -> Result<Vec<PlacementRecord>>;

    /// Inserts one record and returns it with its assigned id.
    async fn insert(&self, record: PlacementRecord) -> Result<PlacementRecord>;

    /// Replaces the record with the same id.
    async fn update(&self, record: &PlacementRecord) -> Result<()>;

    async fn delete(&self, id: &RecordId) -> Result<()>;

    /// Deletes every listed record that exists; returns how many were removed.
    async fn delete_many(&self, ids: &[RecordId]) -> Result<usize>;

    /// Plain multi-row insert. Either every row of the call is stored or none.
    async fn insert_many(&self, records: Vec<PlacementRecord>) -> Result<usize>;

    /// Server-side bulk insert of a whole import, all-or-nothing.
    async fn bulk_insert(&self, records: Vec<PlacementRecord>) -> Result<usize>;

    /// Applies cell edits atomically: all succeed or none do.
    async fn batch_update(&self, updates: &[CellUpdate]) -> Result<usize>;

    /// Master students whose id matches one of `student_ids`.
    async fn master_students(&self, student_ids: &[String]) -> Result<Vec<MasterStudent>>;

    /// Master companies whose name matches one of `names`.
    async fn master_companies(&self, names: &[String]) -> Result<Vec<MasterCompany>>;

    /// Every master student, ordered by id.
    async fn list_master_students(&self) -> Result<Vec<MasterStudent>>;

    /// Every master company, ordered by name.
    async fn list_master_companies(&self) -> Result<Vec<MasterCompany>>;

    /// Inserts students or replaces those with the same id. All-or-nothing;
    /// returns the number of rows written.
    async fn upsert_master_students(&self, students: Vec<MasterStudent>) -> Result<usize>;

    /// Inserts companies or replaces those with the same name.
    async fn upsert_master_companies(&self, companies: Vec<MasterCompany>) -> Result<usize>;

    /// Removes students by id; returns how many were removed.
    async fn delete_master_students(&self, student_ids: &[String]) -> Result<usize>;

    /// Removes companies by name; returns how many were removed.
    async fn delete_master_companies(&self, names: &[String]) -> Result<usize>;
}
