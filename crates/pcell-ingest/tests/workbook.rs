use std::fs;
use std::path::Path;

use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

use pcell_ingest::{
    IngestError, expand_paths, list_sheet_files, parse_clipboard, parse_column, read_workbook,
};
use pcell_model::RawValue;

fn write_two_sheet_workbook(path: &Path) {
    let mut workbook = Workbook::new();
    let first = workbook.add_worksheet();
    first.set_name("Batch A").expect("name sheet");
    first.write_string(0, 0, "PLACED STUDENTS 2024").expect("write");
    first.write_string(2, 0, "Student Name").expect("write");
    first.write_string(2, 1, "CTC").expect("write");
    first.write_string(3, 0, "Asha").expect("write");
    first.write_number(3, 1, 4.5).expect("write");

    let second = workbook.add_worksheet();
    second.set_name("Batch B").expect("name sheet");
    second.write_string(0, 0, "Student Name").expect("write");
    second.write_string(0, 1, "Join Date").expect("write");
    second.write_string(1, 0, "Ravi").expect("write");
    second.write_number(1, 1, 45292).expect("write");

    workbook.add_worksheet().set_name("Empty").expect("name sheet");
    workbook.save(path).expect("save workbook");
}

#[test]
fn reads_every_sheet_of_a_workbook() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("drive.xlsx");
    write_two_sheet_workbook(&path);

    let tables = read_workbook(&path).expect("read workbook");
    assert_eq!(tables.len(), 2);

    // The banner is the first non-blank row, so it becomes the header and the
    // real header row arrives as data for the normalizer to discard.
    assert_eq!(tables[0].label(), "drive.xlsx [Batch A]");
    assert_eq!(tables[0].headers[0], "PLACED STUDENTS 2024");

    assert_eq!(tables[1].headers, vec!["Student Name", "Join Date"]);
    assert_eq!(tables[1].rows[0][0], RawValue::from("Ravi"));
    assert_eq!(tables[1].rows[0][1], RawValue::Number(45292.0));
}

#[test]
fn reads_csv_with_duplicate_headers() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("list.CSV");
    fs::write(&path, "\u{feff}Name,Company,Company\nAsha,Infosys,TCS\n,,\n").expect("write csv");

    let tables = read_workbook(&path).expect("read csv");
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].headers, vec!["Name", "Company", "Company_1"]);
    assert_eq!(tables[0].row_count(), 1);
}

#[test]
fn rejects_unknown_extensions_and_missing_files() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("notes.txt");
    fs::write(&path, "hello").expect("write");
    assert!(matches!(
        read_workbook(&path),
        Err(IngestError::UnsupportedFormat { .. })
    ));
    assert!(matches!(
        read_workbook(&dir.path().join("missing.xlsx")),
        Err(IngestError::FileNotFound { .. })
    ));
}

#[test]
fn directories_expand_to_sorted_spreadsheets() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("b.csv"), "Name\nA\n").expect("write");
    fs::write(dir.path().join("a.csv"), "Name\nB\n").expect("write");
    fs::write(dir.path().join("~$a.xlsx"), "lock").expect("write");
    fs::write(dir.path().join("readme.md"), "docs").expect("write");

    let files = list_sheet_files(dir.path()).expect("list");
    let names: Vec<_> = files
        .iter()
        .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
        .collect();
    assert_eq!(names, vec!["a.csv", "b.csv"]);

    let extra = dir.path().join("b.csv");
    let expanded = expand_paths(&[extra.clone(), dir.path().to_path_buf()]).expect("expand");
    assert_eq!(expanded.len(), 3);
    assert_eq!(expanded[0], extra);
}

#[test]
fn clipboard_requires_a_header_row() {
    assert!(matches!(parse_clipboard("  \n\t\n"), Err(IngestError::ClipboardEmpty)));
    assert!(matches!(
        parse_clipboard("Asha\tInfosys\t4.5\nRavi\tTCS\t3.6"),
        Err(IngestError::MissingHeaders)
    ));

    let table = parse_clipboard("Student Name\tCompany\tCTC\r\nAsha\tInfosys\t4.5\r\n").expect("parse");
    assert_eq!(table.headers, vec!["Student Name", "Company", "CTC"]);
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.rows[0][2], RawValue::from("4.5"));
}

#[test]
fn single_column_paste_keeps_interior_blanks() {
    assert_eq!(parse_column("CSE\n\nECE\n\n"), vec!["CSE", "", "ECE"]);
}
