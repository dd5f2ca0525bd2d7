//! Command line value syntaxes.

use pcell_cli::args::{ArgError, Assignment, CellAssignment, FillSpec, is_yes, parse_row};

#[test]
fn assignment_splits_on_first_equals() {
    let parsed: Assignment = "Remarks=bond = 2 years".parse().expect("assignment");
    assert_eq!(parsed.column, "Remarks");
    assert_eq!(parsed.value, "bond = 2 years");

    let empty: Assignment = "department=".parse().expect("empty value");
    assert_eq!(empty.value, "");
    assert_eq!(empty.to_string(), "department=");
}

#[test]
fn assignment_needs_a_column() {
    assert!(matches!(
        "=CSE".parse::<Assignment>(),
        Err(ArgError::Assignment(_))
    ));
    assert!("CSE".parse::<Assignment>().is_err());
}

#[test]
fn cell_assignment_uses_one_based_rows() {
    let parsed: CellAssignment = "3:Package (LPA)=7.5".parse().expect("cell");
    assert_eq!(parsed.row, 2);
    assert_eq!(parsed.column, "Package (LPA)");
    assert_eq!(parsed.value, "7.5");

    assert!(matches!(
        "0:name=x".parse::<CellAssignment>(),
        Err(ArgError::Row(_))
    ));
    assert!(matches!(
        "two:name=x".parse::<CellAssignment>(),
        Err(ArgError::Row(_))
    ));
    assert!(matches!(
        "2:name".parse::<CellAssignment>(),
        Err(ArgError::CellAssignment(_))
    ));
}

#[test]
fn fill_spec_reads_both_rows() {
    let parsed: FillSpec = "5:offer_type:2".parse().expect("fill");
    assert_eq!(
        parsed,
        FillSpec {
            row: 4,
            column: "offer_type".to_string(),
            to_row: 1,
        }
    );
    assert!(matches!(
        "5:offer_type".parse::<FillSpec>(),
        Err(ArgError::Fill(_))
    ));
    assert!(matches!("5::2".parse::<FillSpec>(), Err(ArgError::Fill(_))));
}

#[test]
fn rows_and_answers() {
    assert_eq!(parse_row(" 1 "), Ok(0));
    assert!(parse_row("-1").is_err());
    assert!(is_yes("Y\n"));
    assert!(is_yes(" yes "));
    assert!(!is_yes("n"));
    assert!(!is_yes(""));
}
