pub mod error;
pub mod json_file;
pub mod memory;
pub mod state;
pub mod store;

pub use error::{Result, StoreError};
pub use json_file::{JsonFileStore, save_snapshot, save_snapshot_async};
pub use memory::{MemoryStore, StoreCall};
pub use state::StoreState;
pub use store::{CellUpdate, Operation, RecordStore};
