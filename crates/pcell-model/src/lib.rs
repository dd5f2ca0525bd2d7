pub mod column;
pub mod error;
pub mod field;
pub mod ids;
pub mod master;
pub mod record;
pub mod session;
pub mod source;
pub mod text;
pub mod value;

pub use column::{ColumnDefinition, ColumnKey, ColumnSet};
pub use error::{ModelError, Result};
pub use field::{FieldKey, FieldKind};
pub use ids::RecordId;
pub use master::{MasterCompany, MasterStudent, master_key};
pub use record::PlacementRecord;
pub use session::{Role, Session};
pub use source::{RawValue, SourceRow};
pub use text::{custom_column_key, normalize_key};
pub use value::{FieldValue, current_year, format_number, parse_number};
