use tempfile::TempDir;

use pcell_model::{ColumnKey, FieldKey, FieldValue, MasterCompany, MasterStudent, PlacementRecord};
use pcell_store::{
    CellUpdate, JsonFileStore, MemoryStore, Operation, RecordStore, StoreCall, StoreError,
};

fn named(name: &str) -> PlacementRecord {
    let mut record = PlacementRecord::blank(2024);
    record.student_name = name.to_string();
    record
}

#[tokio::test]
async fn json_store_survives_reopen() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("data").join("records.json");

    let store = JsonFileStore::open(&path).expect("open store");
    let saved = store.insert(named("Asha")).await.expect("insert");
    store
        .insert_many(vec![named("Ravi"), named("Meera")])
        .await
        .expect("insert many");
    let id = saved.id.clone().expect("assigned id");
    store
        .batch_update(&[CellUpdate {
            id: id.clone(),
            column: ColumnKey::BuiltIn(FieldKey::PackageLpa),
            value: FieldValue::Number(7.25),
        }])
        .await
        .expect("batch update");
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());

    let reopened = JsonFileStore::open(&path).expect("reopen store");
    let records = reopened.select_all().await.expect("select");
    let names: Vec<_> = records.iter().map(|r| r.student_name.as_str()).collect();
    assert_eq!(names, vec!["Meera", "Ravi", "Asha"]);
    let asha = reopened.select_by_ids(&[id]).await.expect("select by id");
    assert_eq!(asha[0].package_lpa, 7.25);
}

#[tokio::test]
async fn json_store_applies_concurrent_writes_in_turn() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("records.json");
    let store = JsonFileStore::open(&path).expect("open store");

    let (asha, ravi, batch) = tokio::join!(
        store.insert(named("Asha")),
        store.insert(named("Ravi")),
        store.insert_many(vec![named("Meera"), named("John")]),
    );
    asha.expect("insert asha");
    ravi.expect("insert ravi");
    assert_eq!(batch.expect("insert batch"), 2);
    assert_eq!(store.select_all().await.expect("select").len(), 4);

    let reopened = JsonFileStore::open(&path).expect("reopen store");
    let mut names: Vec<String> = reopened
        .select_all()
        .await
        .expect("select")
        .into_iter()
        .map(|record| record.student_name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["Asha", "John", "Meera", "Ravi"]);
    assert!(!path.with_extension("json.tmp").exists());
}

#[tokio::test]
async fn json_store_rejects_rows_without_identity() {
    let dir = TempDir::new().expect("temp dir");
    let store = JsonFileStore::open(dir.path().join("records.json")).expect("open store");
    let result = store.bulk_insert(vec![named("Asha"), named("")]).await;
    assert!(matches!(
        result,
        Err(StoreError::Rejected {
            operation: Operation::BulkInsert,
            ..
        })
    ));
    assert!(store.select_all().await.expect("select").is_empty());
}

#[tokio::test]
async fn json_store_reports_corrupt_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("records.json");
    std::fs::write(&path, "[oops").expect("write");
    assert!(matches!(
        JsonFileStore::open(&path),
        Err(StoreError::Parse { .. })
    ));
}

#[tokio::test]
async fn memory_store_logs_calls_and_injects_failures() {
    let store = MemoryStore::new().with_records(vec![named("Asha"), named("Ravi")]);
    store.fail_on(Operation::InsertMany, 2);

    assert_eq!(store.insert_many(vec![named("a")]).await.expect("first"), 1);
    let failed = store.insert_many(vec![named("b"), named("c")]).await;
    assert!(matches!(failed, Err(StoreError::Remote { .. })));
    assert_eq!(store.insert_many(vec![named("d")]).await.expect("third"), 1);

    assert_eq!(
        store.calls_of(Operation::InsertMany),
        vec![
            StoreCall { operation: Operation::InsertMany, rows: 1 },
            StoreCall { operation: Operation::InsertMany, rows: 2 },
            StoreCall { operation: Operation::InsertMany, rows: 1 },
        ]
    );
    let names: Vec<_> = store
        .select_all()
        .await
        .expect("select")
        .into_iter()
        .map(|r| r.student_name)
        .collect();
    assert_eq!(names, vec!["d", "a", "Asha", "Ravi"]);
}

#[tokio::test]
async fn delete_and_master_lookups() {
    let store = MemoryStore::new()
        .with_records(vec![named("Asha"), named("Ravi")])
        .with_master_students(vec![MasterStudent {
            student_id: "1XY21CS001".to_string(),
            student_name: "Asha".to_string(),
            ..MasterStudent::default()
        }]);
    let records = store.select_all().await.expect("select");
    let first = records[0].id.clone().expect("id");
    store.delete(&first).await.expect("delete");
    assert!(matches!(
        store.delete(&first).await,
        Err(StoreError::NotFound { .. })
    ));
    let ids: Vec<_> = records.iter().filter_map(|r| r.id.clone()).collect();
    assert_eq!(store.delete_many(&ids).await.expect("delete many"), 1);

    let students = store
        .master_students(&[" 1xy21cs001 ".to_string()])
        .await
        .expect("master students");
    assert_eq!(students.len(), 1);
}

#[tokio::test]
async fn json_store_keeps_master_upserts_across_reopen() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("records.json");
    let store = JsonFileStore::open(&path).expect("open store");

    let company = |name: &str, hr: &str| MasterCompany {
        name: name.to_string(),
        hr_name: hr.to_string(),
        ..MasterCompany::default()
    };
    store
        .upsert_master_companies(vec![company("Infosys", "Priya"), company("Acme", "")])
        .await
        .expect("upsert");
    store
        .upsert_master_companies(vec![company("INFOSYS ", "Rahul")])
        .await
        .expect("upsert again");
    assert!(matches!(
        store.upsert_master_companies(vec![company(" ", "x")]).await,
        Err(StoreError::Rejected {
            operation: Operation::UpsertMasterCompanies,
            ..
        })
    ));

    let reopened = JsonFileStore::open(&path).expect("reopen store");
    let companies = reopened.list_master_companies().await.expect("list");
    let rows: Vec<(&str, &str)> = companies
        .iter()
        .map(|c| (c.name.as_str(), c.hr_name.as_str()))
        .collect();
    assert_eq!(rows, vec![("Acme", ""), ("INFOSYS ", "Rahul")]);

    assert_eq!(
        reopened
            .delete_master_companies(&["acme".to_string()])
            .await
            .expect("delete"),
        1
    );
    assert_eq!(reopened.list_master_companies().await.expect("list").len(), 1);
    assert!(reopened.list_master_students().await.expect("list").is_empty());
}
