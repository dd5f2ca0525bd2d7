//! Store persisted as a single JSON snapshot on disk.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use pcell_model::{MasterCompany, MasterStudent, PlacementRecord, RecordId};

use crate::error::{Result, StoreError};
use crate::state::StoreState;
use crate::store::{CellUpdate, Operation, RecordStore};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<StoreState>,
    /// Held from snapshot clone to swap so writes apply one at a time and
    /// never share the temp file.
    writes: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    /// Opens the store at `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| StoreError::Io {
                operation: "read",
                path: path.clone(),
                source: e,
            })?;
            serde_json::from_str(&contents).map_err(|e| StoreError::Parse {
                path: path.clone(),
                source: e,
            })?
        } else {
            StoreState::default()
        };
        tracing::debug!(path = %path.display(), records = state.records.len(), "opened store");
        Ok(Self {
            path,
            state: Mutex::new(state),
            writes: tokio::sync::Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `op` to a copy of the state, writes it, then swaps it in.
    /// A failed write leaves the in-memory state untouched. Concurrent calls
    /// queue on the write lock.
    async fn mutate<T>(&self, op: impl FnOnce(&mut StoreState) -> Result<T>) -> Result<T> {
        let _write = self.writes.lock().await;
        let mut next = self.state().clone();
        let output = op(&mut next)?;
        let bytes =
            serde_json::to_vec_pretty(&next).map_err(|e| StoreError::Serialization { source: e })?;
        save_snapshot_async(bytes, self.path.clone()).await?;
        *self.state() = next;
        Ok(output)
    }
}

/// Writes `bytes` to `path` through a temp file and rename.
pub fn save_snapshot(bytes: &[u8], path: &Path) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| StoreError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(&temp_path).map_err(|e| StoreError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;
    file.write_all(bytes).map_err(|e| StoreError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;
    file.sync_all().map_err(|e| StoreError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| StoreError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "saved store snapshot");
    Ok(())
}

/// Runs [`save_snapshot`] on the blocking pool.
pub async fn save_snapshot_async(bytes: Vec<u8>, path: PathBuf) -> Result<()> {
    tokio::task::spawn_blocking(move || save_snapshot(&bytes, &path))
        .await
        .map_err(|e| StoreError::Task {
            message: e.to_string(),
        })?
}

impl RecordStore for JsonFileStore {
    async fn select_all(&self) -> Result<Vec<PlacementRecord>> {
        Ok(self.state().select_all())
    }

    async fn select_by_ids(&self, ids: &[RecordId]) -> Result<Vec<PlacementRecord>> {
        Ok(self.state().select_by_ids(ids))
    }

    async fn insert(&self, record: PlacementRecord) -> Result<PlacementRecord> {
        self.mutate(|state| Ok(state.insert(record))).await
    }

    async fn update(&self, record: &PlacementRecord) -> Result<()> {
        self.mutate(|state| state.update(record)).await
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        self.mutate(|state| state.delete(id)).await
    }

    async fn delete_many(&self, ids: &[RecordId]) -> Result<usize> {
        self.mutate(|state| Ok(state.delete_many(ids))).await
    }

    async fn insert_many(&self, records: Vec<PlacementRecord>) -> Result<usize> {
        self.mutate(|state| state.insert_all(Operation::InsertMany, records))
            .await
    }

    async fn bulk_insert(&self, records: Vec<PlacementRecord>) -> Result<usize> {
        self.mutate(|state| state.insert_all(Operation::BulkInsert, records))
            .await
    }

    async fn batch_update(&self, updates: &[CellUpdate]) -> Result<usize> {
        self.mutate(|state| state.batch_update(updates)).await
    }

    async fn master_students(&self, student_ids: &[String]) -> Result<Vec<MasterStudent>> {
        Ok(self.state().master_students(student_ids))
    }

    async fn master_companies(&self, names: &[String]) -> Result<Vec<MasterCompany>> {
        Ok(self.state().master_companies(names))
    }

    async fn list_master_students(&self) -> Result<Vec<MasterStudent>> {
        Ok(self.state().list_master_students())
    }

    async fn list_master_companies(&self) -> Result<Vec<MasterCompany>> {
        Ok(self.state().list_master_companies())
    }

    async fn upsert_master_students(&self, students: Vec<MasterStudent>) -> Result<usize> {
        self.mutate(|state| state.upsert_master_students(students))
            .await
    }

    async fn upsert_master_companies(&self, companies: Vec<MasterCompany>) -> Result<usize> {
        self.mutate(|state| state.upsert_master_companies(companies))
            .await
    }

    async fn delete_master_students(&self, student_ids: &[String]) -> Result<usize> {
        self.mutate(|state| Ok(state.delete_master_students(student_ids)))
            .await
    }

    async fn delete_master_companies(&self, names: &[String]) -> Result<usize> {
        self.mutate(|state| Ok(state.delete_master_companies(names)))
            .await
    }
}
