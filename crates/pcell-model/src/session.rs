//! Signed-in user context.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;
use crate::record::PlacementRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    PlacementOfficer,
    DepartmentCoordinator,
    Management,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlacementOfficer => "placement_officer",
            Self::DepartmentCoordinator => "department_coordinator",
            Self::Management => "management",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PlacementOfficer => "Placement Officer",
            Self::DepartmentCoordinator => "Department Coordinator",
            Self::Management => "Management",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "placement_officer" | "officer" => Ok(Self::PlacementOfficer),
            "department_coordinator" | "coordinator" => Ok(Self::DepartmentCoordinator),
            "management" => Ok(Self::Management),
            _ => Err(ModelError::UnknownRole(s.to_string())),
        }
    }
}

/// Who is signed in. Only used to pre-fill defaults on new records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: String,
    pub role: Role,
    pub department: Option<String>,
}

impl Session {
    pub fn new(user: impl Into<String>, role: Role) -> Self {
        Self {
            user: user.into(),
            role,
            department: None,
        }
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        let department = department.into();
        let department = department.trim();
        self.department = (!department.is_empty()).then(|| department.to_string());
        self
    }

    /// A blank record carrying the coordinator's department, if any.
    pub fn new_record(&self, year: i32) -> PlacementRecord {
        let mut record = PlacementRecord::blank(year);
        if self.role == Role::DepartmentCoordinator
            && let Some(department) = &self.department
        {
            record.department = department.clone();
        }
        record
    }
}
