//! The placement record as stored by the backend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::column::ColumnKey;
use crate::field::FieldKey;
use crate::ids::RecordId;
use crate::value::{FieldValue, current_year};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub company_name: String,
    pub company_mail: String,
    pub company_address: String,
    pub hr_name: String,
    pub hr_mail: String,
    pub student_name: String,
    pub student_id: String,
    pub student_mail: String,
    pub student_mobile: String,
    pub student_address: String,
    pub department: String,
    pub offer_type: String,
    pub salary: f64,
    pub package_lpa: f64,
    pub current_year: i32,
    pub semester: i32,
    pub join_date: String,
    pub ref_no: String,
    pub other_details: BTreeMap<String, String>,
}

impl Default for PlacementRecord {
    fn default() -> Self {
        Self::blank(current_year())
    }
}

impl PlacementRecord {
    /// An unsaved record with every field at its default.
    pub fn blank(year: i32) -> Self {
        Self {
            id: None,
            company_name: String::new(),
            company_mail: String::new(),
            company_address: String::new(),
            hr_name: String::new(),
            hr_mail: String::new(),
            student_name: String::new(),
            student_id: String::new(),
            student_mail: String::new(),
            student_mobile: String::new(),
            student_address: String::new(),
            department: String::new(),
            offer_type: String::new(),
            salary: 0.0,
            package_lpa: 0.0,
            current_year: year,
            semester: 0,
            join_date: String::new(),
            ref_no: String::new(),
            other_details: BTreeMap::new(),
        }
    }

    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    /// A record without a student name is not a record.
    pub fn has_identity(&self) -> bool {
        !self.student_name.trim().is_empty()
    }

    pub fn value(&self, field: FieldKey) -> FieldValue {
        match field {
            FieldKey::Salary => FieldValue::Number(self.salary),
            FieldKey::PackageLpa => FieldValue::Number(self.package_lpa),
            FieldKey::CurrentYear => FieldValue::Integer(i64::from(self.current_year)),
            FieldKey::Semester => FieldValue::Integer(i64::from(self.semester)),
            text => FieldValue::Text(self.text_slot(text).cloned().unwrap_or_default()),
        }
    }

    /// Writes `value` into `field`, converting to the field's storage type.
    /// Unparseable numbers fall back to the field default.
    pub fn set_value(&mut self, field: FieldKey, value: FieldValue) {
        match field {
            FieldKey::Salary => self.salary = value.as_f64().unwrap_or(0.0),
            FieldKey::PackageLpa => self.package_lpa = value.as_f64().unwrap_or(0.0),
            FieldKey::CurrentYear => {
                self.current_year = to_i32(&value).unwrap_or_else(current_year);
            }
            FieldKey::Semester => self.semester = to_i32(&value).unwrap_or(0),
            text => {
                if let Some(slot) = self.text_slot_mut(text) {
                    *slot = value.to_string().trim().to_string();
                }
            }
        }
    }

    /// Display text of a grid cell.
    pub fn cell_text(&self, key: &ColumnKey) -> String {
        match key {
            ColumnKey::BuiltIn(field) => self.value(*field).to_string(),
            ColumnKey::Custom(name) => self.other_details.get(name).cloned().unwrap_or_default(),
        }
    }

    pub fn set_cell(&mut self, key: &ColumnKey, value: FieldValue) {
        match key {
            ColumnKey::BuiltIn(field) => self.set_value(*field, value),
            ColumnKey::Custom(name) => {
                self.other_details
                    .insert(name.clone(), value.to_string().trim().to_string());
            }
        }
    }

    pub fn is_cell_filled(&self, key: &ColumnKey) -> bool {
        !self.cell_text(key).trim().is_empty()
    }

    fn text_slot(&self, field: FieldKey) -> Option<&String> {
        Some(match field {
            FieldKey::CompanyName => &self.company_name,
            FieldKey::CompanyMail => &self.company_mail,
            FieldKey::CompanyAddress => &self.company_address,
            FieldKey::HrName => &self.hr_name,
            FieldKey::HrMail => &self.hr_mail,
            FieldKey::StudentName => &self.student_name,
            FieldKey::StudentId => &self.student_id,
            FieldKey::StudentMail => &self.student_mail,
            FieldKey::StudentMobile => &self.student_mobile,
            FieldKey::StudentAddress => &self.student_address,
            FieldKey::Department => &self.department,
            FieldKey::OfferType => &self.offer_type,
            FieldKey::JoinDate => &self.join_date,
            FieldKey::RefNo => &self.ref_no,
            FieldKey::Salary
            | FieldKey::PackageLpa
            | FieldKey::CurrentYear
            | FieldKey::Semester => return None,
        })
    }

    fn text_slot_mut(&mut self, field: FieldKey) -> Option<&mut String> {
        Some(match field {
            FieldKey::CompanyName => &mut self.company_name,
            FieldKey::CompanyMail => &mut self.company_mail,
            FieldKey::CompanyAddress => &mut self.company_address,
            FieldKey::HrName => &mut self.hr_name,
            FieldKey::HrMail => &mut self.hr_mail,
            FieldKey::StudentName => &mut self.student_name,
            FieldKey::StudentId => &mut self.student_id,
            FieldKey::StudentMail => &mut self.student_mail,
            FieldKey::StudentMobile => &mut self.student_mobile,
            FieldKey::StudentAddress => &mut self.student_address,
            FieldKey::Department => &mut self.department,
            FieldKey::OfferType => &mut self.offer_type,
            FieldKey::JoinDate => &mut self.join_date,
            FieldKey::RefNo => &mut self.ref_no,
            FieldKey::Salary
            | FieldKey::PackageLpa
            | FieldKey::CurrentYear
            | FieldKey::Semester => return None,
        })
    }
}

fn to_i32(value: &FieldValue) -> Option<i32> {
    value.as_i64().and_then(|value| i32::try_from(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_fields_fall_back_to_defaults() {
        let mut record = PlacementRecord::blank(2024);
        record.set_value(FieldKey::Salary, FieldValue::text("not disclosed"));
        record.set_value(FieldKey::Semester, FieldValue::text("7th"));
        record.set_value(FieldKey::CurrentYear, FieldValue::text(""));
        assert_eq!(record.salary, 0.0);
        assert_eq!(record.semester, 7);
        assert_eq!(record.current_year, current_year());
    }

    #[test]
    fn custom_cells_live_in_other_details() {
        let mut record = PlacementRecord::blank(2024);
        let key = ColumnKey::Custom("bond_period".to_string());
        record.set_cell(&key, FieldValue::text(" 2 years "));
        assert_eq!(record.cell_text(&key), "2 years");
        assert_eq!(record.other_details.get("bond_period").map(String::as_str), Some("2 years"));
    }

    #[test]
    fn cell_text_formats_numbers() {
        let mut record = PlacementRecord::blank(2024);
        record.package_lpa = 4.5;
        record.salary = 450000.0;
        assert_eq!(record.cell_text(&FieldKey::PackageLpa.into()), "4.5");
        assert_eq!(record.cell_text(&FieldKey::Salary.into()), "450000");
        assert_eq!(record.cell_text(&FieldKey::CurrentYear.into()), "2024");
    }
}
