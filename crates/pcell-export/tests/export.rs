use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use tempfile::TempDir;

use pcell_export::{ExportError, ExportFormat, ExportOptions, export_records};
use pcell_model::{ColumnKey, ColumnSet, FieldKey, PlacementRecord};

fn record(name: &str, offer: &str, package: f64) -> PlacementRecord {
    let mut record = PlacementRecord::blank(2024);
    record.student_name = name.to_string();
    record.company_name = "Acme".to_string();
    record.offer_type = offer.to_string();
    record.package_lpa = package;
    record
}

fn narrow_columns() -> ColumnSet {
    let mut columns = ColumnSet::defaults();
    for field in FieldKey::ALL {
        if !matches!(field, FieldKey::StudentName | FieldKey::OfferType | FieldKey::PackageLpa) {
            columns.hide(&ColumnKey::BuiltIn(field)).expect("hide");
        }
    }
    columns
}

fn sheet_rows(path: &Path, sheet: &str) -> Vec<Vec<Data>> {
    let mut workbook = open_workbook_auto(path).expect("open workbook");
    let range = workbook.worksheet_range(sheet).expect("sheet");
    range.rows().map(<[Data]>::to_vec).collect()
}

#[test]
fn xlsx_has_serial_column_and_typed_cells() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("out").join("records.xlsx");
    let records = [record("Asha", "On Campus", 7.5), record("Ravi", "Direct", 6.0)];
    let refs: Vec<&PlacementRecord> = records.iter().collect();

    let summary = export_records(&refs, &narrow_columns(), &path, &ExportOptions::new())
        .expect("export");
    assert_eq!(summary.format, ExportFormat::Xlsx);
    assert_eq!(summary.sheets, vec![("Placement Records".to_string(), 2)]);

    let rows = sheet_rows(&path, "Placement Records");
    assert_eq!(
        rows[0],
        vec![
            Data::String("S.No".into()),
            Data::String("Student Name".into()),
            Data::String("Offer Type".into()),
            Data::String("Package (LPA)".into()),
        ]
    );
    assert_eq!(rows[1][0], Data::Float(1.0));
    assert_eq!(rows[1][1], Data::String("Asha".into()));
    assert_eq!(rows[1][3], Data::Float(7.5));
    assert_eq!(rows[2][0], Data::Float(2.0));
}

#[test]
fn grouped_export_adds_sheet_per_offer_type() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("multi.xlsx");
    let records = [
        record("Asha", "on campus", 7.5),
        record("Ravi", "PPO", 6.0),
        record("Meera", "On Campus", 4.0),
        record("John", "", 3.0),
    ];
    let refs: Vec<&PlacementRecord> = records.iter().collect();
    let options = ExportOptions::new().with_group_by_offer_type(true);

    let summary = export_records(&refs, &narrow_columns(), &path, &options).expect("export");
    assert_eq!(
        summary.sheets,
        vec![
            ("All Records".to_string(), 4),
            ("Internship-PPO Records".to_string(), 1),
            ("On Campus Records".to_string(), 2),
            ("Other Records".to_string(), 1),
        ]
    );

    let on_campus = sheet_rows(&path, "On Campus Records");
    assert_eq!(on_campus.len(), 3);
    assert_eq!(on_campus[2][0], Data::Float(2.0));
    assert_eq!(on_campus[2][1], Data::String("Meera".into()));
}

#[test]
fn csv_flattens_other_details() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("records.csv");
    let mut asha = record("Asha", "Direct", 7.5);
    asha.other_details
        .insert("bond".to_string(), "2 years".to_string());
    let mut ravi = record("Ravi", "Direct", 6.0);
    ravi.other_details
        .insert("remark".to_string(), "waitlisted".to_string());
    let mut columns = narrow_columns();
    columns.add_custom("Bond").expect("custom");

    let options = ExportOptions::new().with_flatten(true);
    export_records(&[&asha, &ravi], &columns, &path, &options).expect("export");

    let text = std::fs::read_to_string(&path).expect("read csv");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "S.No,Student Name,Offer Type,Package (LPA),Bond,remark");
    assert_eq!(lines[1], "1,Asha,Direct,7.5,2 years,");
    assert_eq!(lines[2], "2,Ravi,Direct,6,,waitlisted");
}

#[test]
fn csv_without_flatten_keeps_custom_columns_only() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("records.csv");
    let mut asha = record("Asha", "Direct", 7.5);
    asha.other_details
        .insert("remark".to_string(), "ok".to_string());

    let options = ExportOptions::new().with_serial_column(false);
    export_records(&[&asha], &narrow_columns(), &path, &options).expect("export");
    let text = std::fs::read_to_string(&path).expect("read csv");
    assert_eq!(text.lines().next(), Some("Student Name,Offer Type,Package (LPA)"));
}

#[test]
fn rejects_empty_and_unknown_formats() {
    let dir = TempDir::new().expect("temp dir");
    let columns = ColumnSet::defaults();
    let result = export_records(&[], &columns, &dir.path().join("a.xlsx"), &ExportOptions::new());
    assert!(matches!(result, Err(ExportError::NoRecords)));

    let asha = record("Asha", "", 0.0);
    let result = export_records(
        &[&asha],
        &columns,
        &dir.path().join("a.pdf"),
        &ExportOptions::new(),
    );
    let error = result.expect_err("unsupported");
    assert!(matches!(error, ExportError::UnsupportedFormat { .. }));
    assert!(error.user_message().contains(".xlsx or .csv"));
}
