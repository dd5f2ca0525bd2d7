#![deny(unsafe_code)]

pub mod coerce;
pub mod engine;
pub mod error;
pub mod master;
pub mod normalize;
pub mod offer;
pub mod options;
pub mod patterns;
pub mod repository;

pub use coerce::{coerce_date, coerce_text, coerce_value, parse_date_text, serial_to_date};
pub use engine::{FieldMap, MatchKind, Resolution};
pub use error::{RepositoryError, Result};
pub use master::{
    MASTER_COMPANY_FIELDS, MASTER_STUDENT_FIELDS, MasterRows, master_companies_from_rows,
    master_students_from_rows,
};
pub use normalize::{
    DiscardReason, NormalizeOutcome, NormalizedRecord, normalize_row, normalize_rows,
};
pub use offer::canonical_offer_type;
pub use options::{DateFallback, NormalizeOptions, SerialEpoch};
pub use patterns::HEADER_KEYWORDS;
pub use pcell_model::normalize_key;
pub use repository::{ColumnRepository, PLACEMENT_COLUMNS_KEY, StoredColumnLayout};
