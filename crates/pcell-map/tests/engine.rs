use chrono::NaiveDate;
use proptest::prelude::*;

use pcell_map::{FieldMap, MatchKind, NormalizeOptions, NormalizeOutcome, normalize_row};
use pcell_model::{ColumnKey, ColumnSet, FieldKey, PlacementRecord, RawValue, SourceRow};

fn options() -> NormalizeOptions {
    NormalizeOptions::default().with_today(NaiveDate::from_ymd_opt(2024, 8, 1).expect("date"))
}

/// Re-expresses a record as a source row keyed by storage keys.
fn record_as_row(record: &PlacementRecord, columns: &ColumnSet) -> SourceRow {
    let cells = columns
        .iter()
        .map(|column| {
            let text = record.cell_text(&column.key);
            (column.key.as_str().to_string(), RawValue::from(text.as_str()))
        })
        .collect();
    SourceRow::new(cells)
}

fn normalized(row: &SourceRow, map: &FieldMap) -> PlacementRecord {
    match normalize_row(row, map, &options()) {
        NormalizeOutcome::Record(normalized) => normalized.record,
        NormalizeOutcome::Discarded(reason) => panic!("row discarded: {reason:?}"),
    }
}

#[test]
fn normalizing_a_normalized_record_is_identity() {
    let mut columns = ColumnSet::defaults();
    columns.add_custom("Bond Period").expect("add custom");
    let map = FieldMap::build(&columns);

    let source = SourceRow::from_text(
        &["S.No", "Name of the Student", "USN", "Company", "CTC", "Date of Joining", "Type", "Bond Period"],
        &["1", " Asha K ", "1XY21CS001", "Infosys", "4.5 LPA", "05/07/2024", "on campus", "2 years"],
    );
    let first = normalized(&source, &map);
    assert_eq!(first.student_name, "Asha K");
    assert_eq!(first.student_id, "1XY21CS001");
    assert_eq!(first.package_lpa, 4.5);
    assert_eq!(first.join_date, "2024-07-05");
    assert_eq!(first.offer_type, "On Campus");
    assert_eq!(first.other_details.get("bond_period").map(String::as_str), Some("2 years"));

    let second = normalized(&record_as_row(&first, &columns), &map);
    assert_eq!(second, first);
}

#[test]
fn column_mapping_wins_over_alias() {
    let mut columns = ColumnSet::defaults();
    let ctc = columns.add_custom("CTC").expect("add custom");
    let map = FieldMap::build(&columns);

    let resolution = map.resolve("CTC").expect("resolves");
    assert_eq!(resolution.target, ctc);
    assert_eq!(resolution.kind, MatchKind::Exact);

    let record = normalized(
        &SourceRow::from_text(&["Student Name", "CTC"], &["Ravi", "12 LPA"]),
        &map,
    );
    assert_eq!(record.package_lpa, 0.0);
    assert_eq!(record.other_details.get("ctc").map(String::as_str), Some("12 LPA"));
}

#[test]
fn renamed_label_is_matched_exactly() {
    let mut columns = ColumnSet::defaults();
    columns
        .rename(&FieldKey::Salary.into(), "Monthly Stipend")
        .expect("rename");
    let map = FieldMap::build(&columns);
    let resolution = map.resolve("monthly stipend").expect("resolves");
    assert_eq!(resolution.target, ColumnKey::BuiltIn(FieldKey::Salary));
    assert_eq!(resolution.kind, MatchKind::Exact);
}

#[test]
fn contact_number_fills_student_mobile() {
    let map = FieldMap::build(&ColumnSet::defaults());
    let record = normalized(
        &SourceRow::from_text(&["Student Name", "Contact Number"], &["Meera", "9876543210"]),
        &map,
    );
    assert_eq!(record.student_mobile, "9876543210");
}

#[test]
fn numeric_mobile_cells_keep_all_digits() {
    let map = FieldMap::build(&ColumnSet::defaults());
    let row = SourceRow::new(vec![
        ("Student Name".to_string(), RawValue::from("Meera")),
        ("Mobile".to_string(), RawValue::Number(9876543210.0)),
        ("Join Date".to_string(), RawValue::Number(45292.0)),
    ]);
    let record = normalized(&row, &map);
    assert_eq!(record.student_mobile, "9876543210");
    assert_eq!(record.join_date, "2024-01-01");
}

proptest! {
    #[test]
    fn normalization_is_idempotent(
        name in "[A-Za-z][A-Za-z ]{0,20}[A-Za-z]",
        company in "[A-Za-z0-9 &]{0,16}",
        package in 0u32..5000,
        semester in 0i32..9,
        year in 2000i32..2100,
    ) {
        let columns = ColumnSet::defaults();
        let map = FieldMap::build(&columns);
        let mut record = PlacementRecord::blank(year);
        record.student_name = name.trim().to_string();
        record.company_name = company.trim().to_string();
        record.package_lpa = f64::from(package) / 100.0;
        record.semester = semester;

        let once = normalized(&record_as_row(&record, &columns), &map);
        let twice = normalized(&record_as_row(&once, &columns), &map);
        prop_assert_eq!(&once, &record);
        prop_assert_eq!(once, twice);
    }
}
