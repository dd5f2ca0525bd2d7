use tempfile::TempDir;

use pcell_grid::{AppContext, CellAddr, EditorState, GridEditor, GridError, Key, Modifiers};
use pcell_map::{ColumnRepository, NormalizeOptions, PLACEMENT_COLUMNS_KEY};
use pcell_model::{ColumnKey, ColumnSet, FieldKey, FieldValue, PlacementRecord, Role, Session};
use pcell_store::{MemoryStore, Operation, RecordStore, StoreError};

fn named(name: &str, department: &str) -> PlacementRecord {
    let mut record = PlacementRecord::blank(2024);
    record.student_name = name.to_string();
    record.department = department.to_string();
    record
}

fn seeded_store() -> MemoryStore {
    MemoryStore::new().with_records(vec![
        named("Asha", "CSE"),
        named("Ravi", "ECE"),
        named("Meera", "ME"),
        named("John", "CIVIL"),
    ])
}

async fn loaded_editor(store: &MemoryStore) -> GridEditor {
    let mut editor = GridEditor::new(ColumnSet::defaults());
    editor.refresh(store).await.expect("refresh");
    editor
}

fn col(editor: &GridEditor, field: FieldKey) -> usize {
    editor
        .view_columns()
        .iter()
        .position(|column| column == &ColumnKey::BuiltIn(field))
        .expect("visible column")
}

#[tokio::test]
async fn staged_edits_reach_store_only_on_save() {
    let store = seeded_store();
    let mut editor = loaded_editor(&store).await;
    let dept = col(&editor, FieldKey::Department);
    let package = col(&editor, FieldKey::PackageLpa);

    editor.click(CellAddr::new(0, dept), Modifiers::NONE);
    editor.begin_fill();
    editor.drag_to(3);
    editor.release_fill();
    editor.click(CellAddr::new(1, package), Modifiers::NONE);
    editor.paste("8.25\n7").expect("paste");
    editor.click(CellAddr::new(3, dept), Modifiers::NONE);
    editor.handle_key(Key::Char('X'), Modifiers::NONE);
    editor.handle_key(Key::Enter, Modifiers::NONE);

    assert!(store.calls_of(Operation::BatchUpdate).is_empty());
    let before = store.select_all().await.expect("select");
    assert_eq!(before[1].department, "ECE");

    let staged = editor.buffer().pending();
    let summary = editor
        .save_changes(&store, &NormalizeOptions::default())
        .await
        .expect("save");
    assert_eq!(summary.cells, staged.len());
    assert!(editor.buffer().is_empty());

    let batch_calls = store.calls_of(Operation::BatchUpdate);
    assert_eq!(batch_calls.len(), 1);
    assert_eq!(batch_calls[0].rows, staged.len());

    let after = store.select_all().await.expect("select");
    for edit in staged {
        let record = after
            .iter()
            .find(|record| record.id.as_ref() == Some(&edit.id))
            .expect("record");
        assert_eq!(record.cell_text(&edit.column), edit.text);
    }
    assert_eq!(after[1].package_lpa, 8.25);
    assert_eq!(after[3].department, "X");
    // The editor shows the refetched values.
    assert_eq!(editor.records(), after.as_slice());
}

#[tokio::test]
async fn failed_save_keeps_buffer_for_retry() {
    let store = seeded_store();
    store.fail_on(Operation::BatchUpdate, 1);
    let mut editor = loaded_editor(&store).await;
    let dept = col(&editor, FieldKey::Department);

    editor.click(CellAddr::new(0, dept), Modifiers::NONE);
    editor.paste("ISE").expect("paste");

    let error = editor
        .save_changes(&store, &NormalizeOptions::default())
        .await
        .expect_err("injected failure");
    assert!(matches!(
        error,
        GridError::Store {
            source: StoreError::Remote { .. }
        }
    ));
    assert_eq!(editor.buffer().len(), 1);
    assert_eq!(store.select_all().await.expect("select")[0].department, "CSE");

    editor
        .save_changes(&store, &NormalizeOptions::default())
        .await
        .expect("retry");
    assert!(editor.buffer().is_empty());
    assert_eq!(store.select_all().await.expect("select")[0].department, "ISE");
}

#[tokio::test]
async fn saving_nothing_makes_no_call() {
    let store = seeded_store();
    let mut editor = loaded_editor(&store).await;
    let summary = editor
        .save_changes(&store, &NormalizeOptions::default())
        .await
        .expect("save");
    assert_eq!(summary.cells, 0);
    assert!(store.calls_of(Operation::BatchUpdate).is_empty());
}

#[tokio::test]
async fn open_edit_stays_with_its_record_when_a_record_is_added() {
    let store = seeded_store();
    let mut editor = loaded_editor(&store).await;
    let dept = col(&editor, FieldKey::Department);

    editor.click(CellAddr::new(0, dept), Modifiers::NONE);
    editor.handle_key(Key::Char('C'), Modifiers::NONE);
    assert!(matches!(editor.state(), EditorState::Editing { .. }));

    let session = Session::new("officer", Role::PlacementOfficer);
    editor
        .add_record(&store, &session, 2025, &[])
        .await
        .expect("add");
    // The new record is now row 0; nothing may point at the old row 0.
    assert_eq!(editor.state(), &EditorState::Idle);
    assert_eq!(editor.record_at(0).map(|r| r.student_name.as_str()), Some(""));

    editor.handle_key(Key::Enter, Modifiers::NONE);
    editor
        .save_changes(&store, &NormalizeOptions::default())
        .await
        .expect("save");
    let records = store.select_all().await.expect("select");
    let asha = records
        .iter()
        .find(|record| record.student_name == "Asha")
        .expect("asha");
    assert_eq!(asha.department, "C");
    assert_eq!(records[0].department, "");
}

#[tokio::test]
async fn open_edit_survives_deleting_another_row() {
    let store = seeded_store();
    let mut editor = loaded_editor(&store).await;
    let dept = col(&editor, FieldKey::Department);
    let ravi = editor.records()[1].id.clone().expect("id");

    editor.double_click(CellAddr::new(2, dept));
    editor.set_draft("MECH");
    editor.delete_record(&store, &ravi).await.expect("delete");
    assert_eq!(editor.state(), &EditorState::Idle);

    editor
        .save_changes(&store, &NormalizeOptions::default())
        .await
        .expect("save");
    let records = store.select_all().await.expect("select");
    let departments: Vec<(&str, &str)> = records
        .iter()
        .map(|r| (r.student_name.as_str(), r.department.as_str()))
        .collect();
    assert_eq!(
        departments,
        vec![("Asha", "CSE"), ("Meera", "MECH"), ("John", "CIVIL")]
    );
}

#[tokio::test]
async fn save_includes_the_open_edit() {
    let store = seeded_store();
    let mut editor = loaded_editor(&store).await;
    let dept = col(&editor, FieldKey::Department);

    editor.double_click(CellAddr::new(3, dept));
    editor.set_draft("CIVIL-A");
    let summary = editor
        .save_changes(&store, &NormalizeOptions::default())
        .await
        .expect("save");
    assert_eq!(summary.cells, 1);
    assert_eq!(store.select_all().await.expect("select")[3].department, "CIVIL-A");
}

#[tokio::test]
async fn committed_save_with_failed_reload_is_stale_not_an_error() {
    let store = seeded_store();
    let mut editor = loaded_editor(&store).await;
    // Call 1 was the initial load; call 2 is the reload after saving.
    store.fail_on(Operation::SelectAll, 2);
    let dept = col(&editor, FieldKey::Department);

    editor.click(CellAddr::new(0, dept), Modifiers::NONE);
    editor.paste("ISE").expect("paste");
    let summary = editor
        .save_changes(&store, &NormalizeOptions::default())
        .await
        .expect("save committed");
    assert_eq!(summary.cells, 1);
    assert!(summary.stale);
    assert!(editor.buffer().is_empty());
    assert_eq!(store.select_all().await.expect("select")[0].department, "ISE");

    editor.refresh(&store).await.expect("refresh");
    assert_eq!(editor.records()[0].department, "ISE");
}

#[tokio::test]
async fn add_record_uses_coordinator_department() {
    let store = MemoryStore::new();
    let mut editor = loaded_editor(&store).await;
    let session = Session::new("kavya", Role::DepartmentCoordinator).with_department("CSE");

    let saved = editor
        .add_record(
            &store,
            &session,
            2025,
            &[(
                ColumnKey::BuiltIn(FieldKey::StudentName),
                FieldValue::text("Asha"),
            )],
        )
        .await
        .expect("add");
    assert!(saved.id.is_some());
    assert_eq!(saved.department, "CSE");
    assert_eq!(saved.current_year, 2025);
    assert_eq!(editor.records().len(), 1);
}

#[tokio::test]
async fn update_and_delete_refetch() {
    let store = seeded_store();
    let mut editor = loaded_editor(&store).await;

    let mut ravi = editor.records()[1].clone();
    ravi.offer_type = "Internship".to_string();
    editor.update_record(&store, &ravi).await.expect("update");
    assert_eq!(editor.records()[1].offer_type, "Internship");

    let id = ravi.id.clone().expect("id");
    editor.delete_record(&store, &id).await.expect("delete");
    assert_eq!(editor.records().len(), 3);
    assert!(editor.records().iter().all(|r| r.student_name != "Ravi"));

    let unsaved = named("Nobody", "");
    assert!(matches!(
        editor.update_record(&store, &unsaved).await,
        Err(GridError::MissingRecordId)
    ));
}

#[tokio::test]
async fn delete_all_filtered_removes_only_view_rows() {
    let store = seeded_store();
    let mut editor = loaded_editor(&store).await;
    editor
        .add_filter(&ColumnKey::BuiltIn(FieldKey::Department), "e")
        .expect("filter");
    // ECE, ME and CSE contain "e"; CIVIL does not.
    assert_eq!(editor.view_row_count(), 3);

    let deleted = editor.delete_all_filtered(&store).await.expect("delete");
    assert_eq!(deleted, 3);
    let left = store.select_all().await.expect("select");
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].student_name, "John");
    assert_eq!(editor.row_count().total, 1);
}

#[tokio::test]
async fn paste_as_new_column_stages_into_other_details() {
    let store = seeded_store();
    let mut editor = loaded_editor(&store).await;

    let (key, staged) = editor
        .paste_as_new_column("Bond Period", "2 years\n1 year\n\n3 years\nextra\n")
        .expect("paste column");
    assert_eq!(key, ColumnKey::Custom("bond_period".to_string()));
    assert_eq!(staged, 4);
    assert!(store.calls_of(Operation::BatchUpdate).is_empty());

    editor
        .save_changes(&store, &NormalizeOptions::default())
        .await
        .expect("save");
    let records = store.select_all().await.expect("select");
    assert_eq!(records[0].other_details.get("bond_period").map(String::as_str), Some("2 years"));
    assert_eq!(records[2].other_details.get("bond_period").map(String::as_str), Some(""));
    assert_eq!(records[3].cell_text(&key), "3 years");
}

#[test]
fn context_persists_layout_on_sign_out() {
    let dir = TempDir::new().expect("temp dir");
    let repository = ColumnRepository::new(dir.path()).expect("repository");
    let session = Session::new("officer", Role::PlacementOfficer);

    let mut context = AppContext::start(session.clone(), repository.clone()).expect("start");
    let key = context
        .editor_mut()
        .add_custom_column("Bond Period")
        .expect("add column");
    context
        .editor_mut()
        .hide_column(&ColumnKey::BuiltIn(FieldKey::HrMail))
        .expect("hide");
    context.sign_out().expect("sign out");

    assert!(repository.exists(PLACEMENT_COLUMNS_KEY));
    let restored = AppContext::start(session, repository).expect("restart");
    let columns = restored.editor().columns();
    assert!(columns.contains(&key));
    assert!(
        !columns
            .get(&ColumnKey::BuiltIn(FieldKey::HrMail))
            .expect("hr mail")
            .visible
    );
    assert_eq!(restored.new_record().department, "");
}
