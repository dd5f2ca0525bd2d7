pub mod address;
pub mod buffer;
pub mod commit;
pub mod context;
pub mod editor;
pub mod error;
pub mod filter;

pub use address::{CellAddr, Selection};
pub use buffer::{EditBuffer, PendingEdit};
pub use commit::{SaveSummary, coerce_cell};
pub use context::AppContext;
pub use editor::{EditorState, GridEditor, Key, Modifiers};
pub use error::{GridError, Result};
pub use filter::{FilterCriterion, FilterSet, MatchMode, RowCount};
