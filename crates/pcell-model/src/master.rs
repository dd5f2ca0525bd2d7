//! Reference data used to enrich imported rows.
//!
//! Master students are keyed by `student_id`, master companies by `name`.
//! Keys compare trimmed and case-insensitively.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasterStudent {
    /// Register number (USN, roll number). The upsert key.
    pub student_id: String,
    pub student_name: String,
    pub student_mail: String,
    pub student_mobile: String,
    pub student_address: String,
    pub department: String,
    /// `None` when the source sheet had no year.
    pub current_year: Option<i32>,
    pub semester: Option<i32>,
}

impl MasterStudent {
    pub fn key(&self) -> String {
        master_key(&self.student_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasterCompany {
    /// Company name. The upsert key.
    pub name: String,
    pub mail: String,
    pub address: String,
    pub hr_name: String,
    pub hr_mail: String,
}

impl MasterCompany {
    pub fn key(&self) -> String {
        master_key(&self.name)
    }
}

/// Comparison form of a master key.
pub fn master_key(text: &str) -> String {
    text.trim().to_lowercase()
}
