//! Built-in placement record fields.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a built-in field's value is stored and coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free text, trimmed on import.
    Text,
    /// Decimal amount (salary, package). Defaults to 0.
    Number,
    /// Whole number. Defaults to 0.
    Integer,
    /// Calendar year. Defaults to the current year.
    Year,
    /// `YYYY-MM-DD` date kept as text.
    Date,
}

/// Fixed fields of a student placement record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    CompanyName,
    CompanyMail,
    CompanyAddress,
    HrName,
    HrMail,
    StudentName,
    StudentId,
    StudentMail,
    StudentMobile,
    StudentAddress,
    Department,
    OfferType,
    Salary,
    PackageLpa,
    CurrentYear,
    Semester,
    JoinDate,
    RefNo,
}

impl FieldKey {
    /// Every built-in field in display order.
    pub const ALL: [FieldKey; 18] = [
        FieldKey::CompanyName,
        FieldKey::CompanyMail,
        FieldKey::CompanyAddress,
        FieldKey::HrName,
        FieldKey::HrMail,
        FieldKey::StudentName,
        FieldKey::Department,
        FieldKey::OfferType,
        FieldKey::Salary,
        FieldKey::PackageLpa,
        FieldKey::StudentId,
        FieldKey::StudentMail,
        FieldKey::StudentMobile,
        FieldKey::StudentAddress,
        FieldKey::CurrentYear,
        FieldKey::Semester,
        FieldKey::JoinDate,
        FieldKey::RefNo,
    ];

    /// Stable storage key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CompanyName => "company_name",
            Self::CompanyMail => "company_mail",
            Self::CompanyAddress => "company_address",
            Self::HrName => "hr_name",
            Self::HrMail => "hr_mail",
            Self::StudentName => "student_name",
            Self::StudentId => "student_id",
            Self::StudentMail => "student_mail",
            Self::StudentMobile => "student_mobile",
            Self::StudentAddress => "student_address",
            Self::Department => "department",
            Self::OfferType => "offer_type",
            Self::Salary => "salary",
            Self::PackageLpa => "package_lpa",
            Self::CurrentYear => "current_year",
            Self::Semester => "semester",
            Self::JoinDate => "join_date",
            Self::RefNo => "ref_no",
        }
    }

    /// Default display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::CompanyName => "Company Name",
            Self::CompanyMail => "Company Mail",
            Self::CompanyAddress => "Company Address",
            Self::HrName => "HR Name",
            Self::HrMail => "HR Mail",
            Self::StudentName => "Student Name",
            Self::StudentId => "Student ID",
            Self::StudentMail => "Student Mail",
            Self::StudentMobile => "Student Mobile",
            Self::StudentAddress => "Student Address",
            Self::Department => "Department",
            Self::OfferType => "Offer Type",
            Self::Salary => "Salary",
            Self::PackageLpa => "Package (LPA)",
            Self::CurrentYear => "Year",
            Self::Semester => "Semester",
            Self::JoinDate => "Join Date",
            Self::RefNo => "Ref No",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::Salary | Self::PackageLpa => FieldKind::Number,
            Self::Semester => FieldKind::Integer,
            Self::CurrentYear => FieldKind::Year,
            Self::JoinDate => FieldKind::Date,
            _ => FieldKind::Text,
        }
    }

    /// Looks up a field by its storage key (exact, case-insensitive).
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
