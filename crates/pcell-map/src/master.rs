//! Master student and company lists read from spreadsheets.
//!
//! Master sheets go through the same header matching, banner detection and
//! value coercion as placement imports, restricted to the fields each list
//! carries.

use pcell_model::{ColumnSet, FieldKey, MasterCompany, MasterStudent, SourceRow};

use crate::engine::FieldMap;
use crate::normalize::{NormalizedRecord, normalize_rows};
use crate::options::NormalizeOptions;
use crate::patterns::{ALIASES, MASTER_COMPANY_ALIASES};

pub const MASTER_STUDENT_FIELDS: [FieldKey; 8] = [
    FieldKey::StudentId,
    FieldKey::StudentName,
    FieldKey::StudentMail,
    FieldKey::StudentMobile,
    FieldKey::StudentAddress,
    FieldKey::Department,
    FieldKey::CurrentYear,
    FieldKey::Semester,
];

pub const MASTER_COMPANY_FIELDS: [FieldKey; 5] = [
    FieldKey::CompanyName,
    FieldKey::CompanyMail,
    FieldKey::CompanyAddress,
    FieldKey::HrName,
    FieldKey::HrMail,
];

/// Rows kept from a master sheet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MasterRows<T> {
    pub rows: Vec<T>,
    /// Blank, banner and repeated header rows, plus rows missing their key.
    pub discarded: usize,
}

/// Students need both a register number and a name.
pub fn master_students_from_rows<'a>(
    rows: impl IntoIterator<Item = &'a SourceRow>,
    options: &NormalizeOptions,
) -> MasterRows<MasterStudent> {
    let map = FieldMap::build(&ColumnSet::built_ins(&MASTER_STUDENT_FIELDS));
    let options = options
        .clone()
        .with_identity_field(FieldKey::StudentName);
    let (records, mut discarded) = normalize_rows(rows, &map, &options);

    let mut students = Vec::with_capacity(records.len());
    for normalized in &records {
        let student = to_student(normalized);
        if student.student_id.is_empty() {
            discarded += 1;
            continue;
        }
        students.push(student);
    }
    tracing::debug!(students = students.len(), discarded, "read master students");
    MasterRows {
        rows: students,
        discarded,
    }
}

/// Companies need a name.
pub fn master_companies_from_rows<'a>(
    rows: impl IntoIterator<Item = &'a SourceRow>,
    options: &NormalizeOptions,
) -> MasterRows<MasterCompany> {
    let aliases: Vec<(&str, FieldKey)> = MASTER_COMPANY_ALIASES
        .iter()
        .chain(ALIASES)
        .copied()
        .collect();
    let map = FieldMap::build_with_aliases(
        &ColumnSet::built_ins(&MASTER_COMPANY_FIELDS),
        &aliases,
    );
    let options = options
        .clone()
        .with_identity_field(FieldKey::CompanyName);
    let (records, discarded) = normalize_rows(rows, &map, &options);

    let companies: Vec<MasterCompany> = records
        .iter()
        .map(|normalized| {
            let record = &normalized.record;
            MasterCompany {
                name: record.company_name.clone(),
                mail: record.company_mail.clone(),
                address: record.company_address.clone(),
                hr_name: record.hr_name.clone(),
                hr_mail: record.hr_mail.clone(),
            }
        })
        .collect();
    tracing::debug!(companies = companies.len(), discarded, "read master companies");
    MasterRows {
        rows: companies,
        discarded,
    }
}

fn to_student(normalized: &NormalizedRecord) -> MasterStudent {
    let record = &normalized.record;
    let filled = |field: FieldKey| normalized.filled.contains(&field);
    MasterStudent {
        student_id: record.student_id.trim().to_string(),
        student_name: record.student_name.clone(),
        student_mail: record.student_mail.clone(),
        student_mobile: record.student_mobile.clone(),
        student_address: record.student_address.clone(),
        department: record.department.clone(),
        current_year: filled(FieldKey::CurrentYear).then_some(record.current_year),
        semester: (filled(FieldKey::Semester) && record.semester > 0).then_some(record.semester),
    }
}
