use std::cell::Cell;

use proptest::prelude::*;
use tempfile::TempDir;

use pcell_import::{
    AlwaysConfirm, ImportError, ImportOptions, ImportPrompt, ImportSource, InsertMode, run_import,
};
use pcell_model::{ColumnSet, MasterCompany, MasterStudent};
use pcell_store::{MemoryStore, Operation, RecordStore};

fn clipboard(rows: usize) -> ImportSource {
    let mut text = String::from("Name\tUSN\tCompany\tCTC\n");
    for i in 0..rows {
        text.push_str(&format!("Student {i}\t1XX{i:03}\tAcme\t{}.5 LPA\n", i % 9));
    }
    ImportSource::Clipboard(text)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn sequential_import_uses_ceil_batches_in_order(rows in 1usize..180) {
        let store = MemoryStore::new();
        let outcome = runtime()
            .block_on(run_import(
                &store,
                &ColumnSet::defaults(),
                &clipboard(rows),
                &ImportOptions::new().with_enrich(false),
                &AlwaysConfirm,
            ))
            .expect("import");

        let expected_batches = rows.div_ceil(50);
        prop_assert_eq!(outcome.inserted, rows);
        prop_assert_eq!(outcome.batches, expected_batches);

        let calls = store.calls_of(Operation::InsertMany);
        prop_assert_eq!(calls.len(), expected_batches);
        prop_assert!(calls.iter().all(|call| call.rows <= 50));
        prop_assert_eq!(calls.iter().map(|call| call.rows).sum::<usize>(), rows);

        // Newest first: the last sheet row is at the front.
        let stored = store.snapshot().records;
        prop_assert_eq!(stored.first().map(|r| r.student_name.clone()), Some(format!("Student {}", rows - 1)));
        prop_assert_eq!(stored.last().map(|r| r.student_name.clone()), Some("Student 0".to_string()));
    }
}

#[tokio::test]
async fn failing_batch_reports_committed_rows() {
    let store = MemoryStore::new();
    store.fail_on(Operation::InsertMany, 2);

    let error = run_import(
        &store,
        &ColumnSet::defaults(),
        &clipboard(120),
        &ImportOptions::new().with_enrich(false),
        &AlwaysConfirm,
    )
    .await
    .expect_err("second batch fails");

    assert!(matches!(
        error,
        ImportError::PartialImport {
            committed: 50,
            total: 120,
            ..
        }
    ));
    assert_eq!(error.committed(), 50);
    assert!(error.user_message().contains("50 of 120"));
    assert_eq!(store.snapshot().records.len(), 50);
    // Third batch never attempted.
    assert_eq!(store.calls_of(Operation::InsertMany).len(), 2);
}

#[tokio::test]
async fn atomic_mode_stores_nothing_on_failure() {
    let store = MemoryStore::new();
    store.fail_on(Operation::BulkInsert, 1);
    let options = ImportOptions::new()
        .with_enrich(false)
        .with_insert_mode(InsertMode::Atomic);

    let error = run_import(
        &store,
        &ColumnSet::defaults(),
        &clipboard(75),
        &options,
        &AlwaysConfirm,
    )
    .await
    .expect_err("bulk insert fails");

    assert!(matches!(error, ImportError::Remote { .. }));
    assert_eq!(error.committed(), 0);
    assert!(store.snapshot().records.is_empty());
}

#[tokio::test]
async fn atomic_mode_uses_one_call() {
    let store = MemoryStore::new();
    let options = ImportOptions::new()
        .with_enrich(false)
        .with_insert_mode(InsertMode::Atomic);

    let outcome = run_import(
        &store,
        &ColumnSet::defaults(),
        &clipboard(75),
        &options,
        &AlwaysConfirm,
    )
    .await
    .expect("import");

    assert_eq!(outcome.inserted, 75);
    assert_eq!(outcome.batches, 1);
    assert_eq!(store.calls_of(Operation::BulkInsert).len(), 1);
    assert!(store.calls_of(Operation::InsertMany).is_empty());
}

#[tokio::test]
async fn declined_import_writes_nothing() {
    let store = MemoryStore::new();
    let asked = Cell::new(0usize);
    let decline = |prompt: &ImportPrompt| {
        asked.set(prompt.rows);
        false
    };

    let error = run_import(
        &store,
        &ColumnSet::defaults(),
        &clipboard(11),
        &ImportOptions::new(),
        &decline,
    )
    .await
    .expect_err("declined");

    assert!(matches!(error, ImportError::Declined { rows: 11 }));
    assert_eq!(asked.get(), 11);
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn small_imports_skip_confirmation() {
    let store = MemoryStore::new();
    let never = |_: &ImportPrompt| -> bool { panic!("should not ask") };

    let outcome = run_import(
        &store,
        &ColumnSet::defaults(),
        &clipboard(10),
        &ImportOptions::new().with_enrich(false),
        &never,
    )
    .await
    .expect("import");
    assert_eq!(outcome.inserted, 10);
}

#[tokio::test]
async fn clipboard_without_header_is_rejected() {
    let store = MemoryStore::new();
    let source = ImportSource::Clipboard("Asha\tAcme\t7\nRavi\tGlobex\t9\n".to_string());

    let error = run_import(
        &store,
        &ColumnSet::defaults(),
        &source,
        &ImportOptions::new(),
        &AlwaysConfirm,
    )
    .await
    .expect_err("no header");
    assert!(matches!(error, ImportError::MissingHeaders));

    let error = run_import(
        &store,
        &ColumnSet::defaults(),
        &ImportSource::Clipboard("  \n".to_string()),
        &ImportOptions::new(),
        &AlwaysConfirm,
    )
    .await
    .expect_err("empty");
    assert!(matches!(error, ImportError::ClipboardEmpty));
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn rows_without_names_are_discarded() {
    let store = MemoryStore::new();
    let source =
        ImportSource::Clipboard("Name\tCompany\nAsha\tAcme\n\tGlobex\nRavi\tInitech\n".to_string());

    let outcome = run_import(
        &store,
        &ColumnSet::defaults(),
        &source,
        &ImportOptions::new().with_enrich(false),
        &AlwaysConfirm,
    )
    .await
    .expect("import");
    assert_eq!(outcome.inserted, 2);
    assert_eq!(outcome.discarded, 1);

    let only_blank = ImportSource::Clipboard("Name\tCompany\n\tGlobex\n".to_string());
    let error = run_import(
        &store,
        &ColumnSet::defaults(),
        &only_blank,
        &ImportOptions::new(),
        &AlwaysConfirm,
    )
    .await
    .expect_err("nothing valid");
    assert!(matches!(error, ImportError::NoValidRows { discarded: 1 }));
}

#[tokio::test]
async fn enrichment_fills_gaps_without_overwriting() {
    let store = MemoryStore::new()
        .with_master_students(vec![MasterStudent {
            student_id: "1CS001".to_string(),
            student_name: "Asha".to_string(),
            student_mail: "asha@college.edu".to_string(),
            student_mobile: "9000000001".to_string(),
            department: "CSE".to_string(),
            semester: Some(7),
            ..MasterStudent::default()
        }])
        .with_master_companies(vec![MasterCompany {
            name: "Acme".to_string(),
            mail: "jobs@acme.test".to_string(),
            hr_name: "Priya".to_string(),
            ..MasterCompany::default()
        }]);
    let source = ImportSource::Clipboard(
        "Name\tUSN\tCompany\tDepartment\nAsha\t1cs001\tacme\tISE\n".to_string(),
    );

    let outcome = run_import(
        &store,
        &ColumnSet::defaults(),
        &source,
        &ImportOptions::new(),
        &AlwaysConfirm,
    )
    .await
    .expect("import");
    assert_eq!(outcome.enriched, 1);

    let stored = store.select_all().await.expect("select");
    let asha = &stored[0];
    assert_eq!(asha.student_mail, "asha@college.edu");
    assert_eq!(asha.student_mobile, "9000000001");
    assert_eq!(asha.semester, 7);
    assert_eq!(asha.department, "ISE");
    assert_eq!(asha.company_mail, "jobs@acme.test");
    assert_eq!(asha.hr_name, "Priya");
    assert_eq!(store.calls_of(Operation::MasterStudents).len(), 1);
    assert_eq!(store.calls_of(Operation::MasterCompanies).len(), 1);
}

#[tokio::test]
async fn enrichment_failure_does_not_block_import() {
    let store = MemoryStore::new();
    store.fail_on(Operation::MasterStudents, 1);

    let outcome = run_import(
        &store,
        &ColumnSet::defaults(),
        &clipboard(3),
        &ImportOptions::new(),
        &AlwaysConfirm,
    )
    .await
    .expect("import");
    assert_eq!(outcome.inserted, 3);
    assert_eq!(outcome.enriched, 0);
}

#[tokio::test]
async fn imports_every_sheet_of_a_csv_directory() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join("a.csv"),
        "Student Name,Company,Package\nAsha,Acme,7\n",
    )
    .expect("write a");
    std::fs::write(
        dir.path().join("b.csv"),
        "Name,Organization,CTC\nRavi,Globex,9.5\nMeera,Initech,6\n",
    )
    .expect("write b");

    let store = MemoryStore::new();
    let outcome = run_import(
        &store,
        &ColumnSet::defaults(),
        &ImportSource::Files(vec![dir.path().to_path_buf()]),
        &ImportOptions::new().with_enrich(false),
        &AlwaysConfirm,
    )
    .await
    .expect("import");

    assert_eq!(outcome.inserted, 3);
    assert_eq!(outcome.sources.len(), 2);
    let stored = store.select_all().await.expect("select");
    let ravi = stored
        .iter()
        .find(|r| r.student_name == "Ravi")
        .expect("ravi stored");
    assert_eq!(ravi.company_name, "Globex");
    assert_eq!(ravi.package_lpa, 9.5);
}
