//! Filling gaps in imported rows from master reference data.

use std::collections::{BTreeMap, BTreeSet};

use pcell_map::NormalizedRecord;
use pcell_model::{FieldKey, FieldValue, MasterCompany, MasterStudent};
use pcell_store::{RecordStore, Result};

/// Looks up master data for every distinct student id and company name in
/// `records` (one store query each) and fills fields the sheet left empty.
/// Returns the number of records that changed.
pub async fn enrich_records<S: RecordStore>(
    store: &S,
    records: &mut [NormalizedRecord],
) -> Result<usize> {
    let student_ids = distinct(records.iter().map(|r| r.record.student_id.as_str()));
    let company_names = distinct(records.iter().map(|r| r.record.company_name.as_str()));

    let students: BTreeMap<String, MasterStudent> = if student_ids.is_empty() {
        BTreeMap::new()
    } else {
        store
            .master_students(&student_ids)
            .await?
            .into_iter()
            .map(|student| (lookup_key(&student.student_id), student))
            .collect()
    };
    let companies: BTreeMap<String, MasterCompany> = if company_names.is_empty() {
        BTreeMap::new()
    } else {
        store
            .master_companies(&company_names)
            .await?
            .into_iter()
            .map(|company| (lookup_key(&company.name), company))
            .collect()
    };

    let mut changed = 0usize;
    for normalized in records.iter_mut() {
        let mut touched = false;
        if let Some(student) = students.get(&lookup_key(&normalized.record.student_id)) {
            touched |= apply_student(normalized, student);
        }
        if let Some(company) = companies.get(&lookup_key(&normalized.record.company_name)) {
            touched |= apply_company(normalized, company);
        }
        if touched {
            changed += 1;
        }
    }
    tracing::info!(
        students = students.len(),
        companies = companies.len(),
        enriched = changed,
        "applied master data"
    );
    Ok(changed)
}

fn apply_student(normalized: &mut NormalizedRecord, student: &MasterStudent) -> bool {
    let mut touched = false;
    for (field, value) in [
        (FieldKey::StudentMail, &student.student_mail),
        (FieldKey::StudentMobile, &student.student_mobile),
        (FieldKey::StudentAddress, &student.student_address),
        (FieldKey::Department, &student.department),
    ] {
        touched |= fill_text(normalized, field, value);
    }
    for (field, value) in [
        (FieldKey::CurrentYear, student.current_year),
        (FieldKey::Semester, student.semester),
    ] {
        if let Some(value) = value
            && !normalized.filled.contains(&field)
        {
            normalized
                .record
                .set_value(field, FieldValue::Integer(i64::from(value)));
            normalized.filled.insert(field);
            touched = true;
        }
    }
    touched
}

fn apply_company(normalized: &mut NormalizedRecord, company: &MasterCompany) -> bool {
    let mut touched = false;
    for (field, value) in [
        (FieldKey::CompanyMail, &company.mail),
        (FieldKey::CompanyAddress, &company.address),
        (FieldKey::HrName, &company.hr_name),
        (FieldKey::HrMail, &company.hr_mail),
    ] {
        touched |= fill_text(normalized, field, value);
    }
    touched
}

/// Sheet values always win over master data.
fn fill_text(normalized: &mut NormalizedRecord, field: FieldKey, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty()
        || normalized.filled.contains(&field)
        || !normalized.record.value(field).to_string().trim().is_empty()
    {
        return false;
    }
    normalized.record.set_value(field, FieldValue::text(value));
    normalized.filled.insert(field);
    true
}

fn lookup_key(value: &str) -> String {
    value.trim().to_lowercase()
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .filter(|value| seen.insert(lookup_key(value)))
        .map(str::to_string)
        .collect()
}
