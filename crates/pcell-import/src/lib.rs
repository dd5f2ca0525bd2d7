pub mod confirm;
pub mod enrich;
pub mod error;
pub mod master;
pub mod options;
pub mod pipeline;

pub use confirm::{AlwaysConfirm, ConfirmImport, ImportPrompt};
pub use enrich::enrich_records;
pub use error::{ImportError, Result};
pub use master::{MasterImportOutcome, MasterKind, import_master};
pub use options::{DEFAULT_BATCH_SIZE, DEFAULT_CONFIRM_THRESHOLD, ImportOptions, InsertMode};
pub use pipeline::{
    ImportOutcome, ImportSource, PreparedImport, prepare, read_source, run_import, submit,
};
