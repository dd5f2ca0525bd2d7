//! Subcommand implementations.
//!
//! Every command opens the store and the signed-in context, works through
//! the grid editor or the import pipeline, and signs out, which persists the
//! column layout.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use tracing::{debug, info, trace};

use pcell_cli::args::{Assignment, is_yes};
use pcell_cli::logging::redact_value;
use pcell_export::{ExportError, ExportFormat, ExportOptions, ExportSummary, default_file_name};
use pcell_grid::{
    AppContext, CellAddr, GridEditor, GridError, Key, MatchMode, Modifiers, SaveSummary,
    coerce_cell,
};
use pcell_import::{
    AlwaysConfirm, ConfirmImport, ImportError, ImportOptions, ImportOutcome, ImportPrompt,
    ImportSource, InsertMode, MasterKind,
};
use pcell_map::{ColumnRepository, NormalizeOptions, RepositoryError, SerialEpoch};
use pcell_model::{
    ColumnKey, ColumnSet, PlacementRecord, RecordId, Session, current_year, master_key,
};
use pcell_store::{JsonFileStore, RecordStore, StoreError};

use crate::cli::{
    AddArgs, ColumnsCommand, DateSystemArg, DeleteArgs, EditArgs, ExportArgs, ExportFormatArg,
    FilterArgs, GlobalArgs, ImportArgs, ImportFlags, ListArgs, MasterCommand, MasterKindArg,
    PasteArgs,
};
use crate::summary::{
    print_columns, print_master_companies, print_master_import, print_master_students,
    print_records,
};

const STORE_FILE: &str = "records.json";
const LAYOUT_DIR: &str = "layout";

// ============================================================================
// User-facing errors
// ============================================================================

/// Library errors that carry a message written for the person at the terminal.
trait UserMessage: std::error::Error + Send + Sync + 'static {
    fn message(&self) -> String;
}

impl UserMessage for ImportError {
    fn message(&self) -> String {
        self.user_message()
    }
}

impl UserMessage for GridError {
    fn message(&self) -> String {
        self.user_message()
    }
}

impl UserMessage for ExportError {
    fn message(&self) -> String {
        self.user_message()
    }
}

impl UserMessage for StoreError {
    fn message(&self) -> String {
        self.user_message()
    }
}

impl UserMessage for RepositoryError {
    fn message(&self) -> String {
        self.user_message()
    }
}

/// Puts the user message on top of the error chain.
trait UserFacing<T> {
    fn user_facing(self) -> Result<T>;
}

impl<T, E: UserMessage> UserFacing<T> for std::result::Result<T, E> {
    fn user_facing(self) -> Result<T> {
        self.map_err(|error| {
            let message = error.message();
            anyhow::Error::new(error).context(message)
        })
    }
}

// ============================================================================
// Workspace
// ============================================================================

/// The record store plus the signed-in context for one command.
struct Workspace {
    store: JsonFileStore,
    context: AppContext,
}

impl Workspace {
    async fn open(global: &GlobalArgs) -> Result<Self> {
        fs::create_dir_all(&global.data_dir).with_context(|| {
            format!("failed to create data folder {}", global.data_dir.display())
        })?;
        let store = JsonFileStore::open(global.data_dir.join(STORE_FILE)).user_facing()?;
        let repository = ColumnRepository::new(global.data_dir.join(LAYOUT_DIR)).user_facing()?;
        let mut context = AppContext::start(session(global), repository).user_facing()?;
        context.editor_mut().refresh(&store).await.user_facing()?;
        Ok(Self { store, context })
    }

    fn editor(&self) -> &GridEditor {
        self.context.editor()
    }

    fn close(self) -> Result<()> {
        self.context.sign_out().user_facing()?;
        Ok(())
    }
}

fn session(global: &GlobalArgs) -> Session {
    let session = Session::new(global.user.clone(), global.role);
    match &global.department {
        Some(department) => session.with_department(department.as_str()),
        None => session,
    }
}

fn resolve_column(columns: &ColumnSet, text: &str) -> Result<ColumnKey> {
    columns
        .find_by_key_str(text)
        .map(|column| column.key.clone())
        .ok_or_else(|| anyhow!("unknown column {text:?}; see `pcell columns list`"))
}

fn apply_filters(editor: &mut GridEditor, args: &FilterArgs) -> Result<()> {
    editor.set_match_mode(if args.exact {
        MatchMode::Exact
    } else {
        MatchMode::Contains
    });
    for Assignment { column, value } in &args.filters {
        let key = resolve_column(editor.columns(), column)?;
        editor.add_filter(&key, value.as_str()).user_facing()?;
    }
    if let Some(search) = &args.search {
        editor.set_search(search.as_str());
    }
    editor.set_strict_view(args.strict_view);
    debug!(
        filters = args.filters.len(),
        shown = editor.view_row_count(),
        "applied filters"
    );
    Ok(())
}

fn check_row(editor: &GridEditor, row: usize) -> Result<()> {
    let rows = editor.view_row_count();
    if row >= rows {
        return Err::<(), _>(GridError::RowOutOfRange { row, rows }).user_facing();
    }
    Ok(())
}

fn cell_addr(editor: &GridEditor, row: usize, column: &str) -> Result<CellAddr> {
    let key = resolve_column(editor.columns(), column)?;
    check_row(editor, row)?;
    let col = editor
        .view_columns()
        .iter()
        .position(|visible| visible == &key)
        .ok_or_else(|| anyhow!("column {column:?} is hidden in this view"))?;
    Ok(CellAddr::new(row, col))
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => io::read_to_string(io::stdin()).context("failed to read stdin"),
    }
}

/// Asks a yes/no question on stderr; anything but yes, or end of input, is no.
fn ask(question: &str) -> bool {
    eprint!("{question} [y/N] ");
    if io::stderr().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => is_yes(&answer),
    }
}

struct StdinConfirm;

impl ConfirmImport for StdinConfirm {
    fn confirm(&self, prompt: &ImportPrompt) -> bool {
        let question = if prompt.discarded > 0 {
            format!("{} {} rows will be skipped.", prompt.message(), prompt.discarded)
        } else {
            prompt.message()
        };
        ask(&question)
    }
}

// ============================================================================
// Import
// ============================================================================

pub async fn run_import_files(global: &GlobalArgs, args: &ImportArgs) -> Result<ImportOutcome> {
    import(global, &ImportSource::Files(args.paths.clone()), &args.flags).await
}

pub async fn run_paste(global: &GlobalArgs, args: &PasteArgs) -> Result<ImportOutcome> {
    let text = read_input(args.file.as_deref())?;
    import(global, &ImportSource::Clipboard(text), &args.flags).await
}

async fn import(
    global: &GlobalArgs,
    source: &ImportSource,
    flags: &ImportFlags,
) -> Result<ImportOutcome> {
    let workspace = Workspace::open(global).await?;
    let options = import_options(flags);
    let confirm: &dyn ConfirmImport = if flags.yes {
        &AlwaysConfirm
    } else {
        &StdinConfirm
    };
    let outcome = pcell_import::run_import(
        &workspace.store,
        workspace.editor().columns(),
        source,
        &options,
        confirm,
    )
    .await
    .user_facing()?;
    workspace.close()?;
    Ok(outcome)
}

fn import_options(flags: &ImportFlags) -> ImportOptions {
    let epoch = match flags.date_system {
        DateSystemArg::Excel1900 => SerialEpoch::Excel1900,
        DateSystemArg::Excel1904 => SerialEpoch::Excel1904,
    };
    let mode = if flags.atomic {
        InsertMode::Atomic
    } else {
        InsertMode::Sequential
    };
    ImportOptions::new()
        .with_batch_size(flags.batch_size)
        .with_insert_mode(mode)
        .with_enrich(!flags.no_enrich)
        .with_normalize(NormalizeOptions::new().with_epoch(epoch))
}

// ============================================================================
// Grid
// ============================================================================

pub async fn run_list(global: &GlobalArgs, args: &ListArgs) -> Result<()> {
    let mut workspace = Workspace::open(global).await?;
    apply_filters(workspace.context.editor_mut(), &args.filter)?;
    print_records(workspace.editor(), args.ids);
    workspace.close()
}

pub async fn run_columns(global: &GlobalArgs, command: &ColumnsCommand) -> Result<()> {
    let mut workspace = Workspace::open(global).await?;
    let Workspace { store, context } = &mut workspace;
    let editor = context.editor_mut();
    match command {
        ColumnsCommand::List => print_columns(editor.columns()),
        ColumnsCommand::Add { name } => {
            let key = editor.add_custom_column(name).user_facing()?;
            println!("Added column {name} ({key})");
        }
        ColumnsCommand::Rename { column, label } => {
            let key = resolve_column(editor.columns(), column)?;
            editor.rename_column(&key, label).user_facing()?;
            println!("Renamed {key} to {label}");
        }
        ColumnsCommand::Hide { column } => {
            let key = resolve_column(editor.columns(), column)?;
            editor.hide_column(&key).user_facing()?;
            println!("Hid {key}");
        }
        ColumnsCommand::Show { column } => {
            let key = resolve_column(editor.columns(), column)?;
            editor.unhide_column(&key).user_facing()?;
            println!("Showing {key}");
        }
        ColumnsCommand::Paste {
            name,
            file,
            from_row,
            filter,
        } => {
            apply_filters(editor, filter)?;
            let text = read_input(file.as_deref())?;
            if editor.view_row_count() > 0 {
                check_row(editor, *from_row)?;
                editor.click(CellAddr::new(*from_row, 0), Modifiers::NONE);
            }
            let (key, staged) = editor.paste_as_new_column(name, &text).user_facing()?;
            let summary = editor
                .save_changes(store, &NormalizeOptions::default())
                .await
                .user_facing()?;
            info!(column = %key, staged, cells = summary.cells, "pasted column saved");
            println!("Added column {name} ({key}) with {} values", summary.cells);
        }
    }
    workspace.close()
}

pub async fn run_edit(global: &GlobalArgs, args: &EditArgs) -> Result<SaveSummary> {
    if args.set.is_empty() && args.fill.is_empty() {
        bail!("nothing to edit; pass --set or --fill");
    }
    let mut workspace = Workspace::open(global).await?;
    let Workspace { store, context } = &mut workspace;
    let editor = context.editor_mut();
    apply_filters(editor, &args.filter)?;

    for edit in &args.set {
        let cell = cell_addr(editor, edit.row, &edit.column)?;
        editor.double_click(cell);
        editor.set_draft(edit.value.as_str());
        editor.handle_key(Key::Enter, Modifiers::NONE);
        trace!(
            row = edit.row + 1,
            column = %edit.column,
            value = redact_value(&edit.value),
            "staged cell"
        );
    }
    for fill in &args.fill {
        let cell = cell_addr(editor, fill.row, &fill.column)?;
        check_row(editor, fill.to_row)?;
        editor.click(cell, Modifiers::NONE);
        editor.begin_fill();
        editor.drag_to(fill.to_row);
        let staged = editor.release_fill();
        debug!(row = fill.row + 1, to_row = fill.to_row + 1, staged, "filled cells");
    }

    let summary = editor
        .save_changes(store, &NormalizeOptions::default())
        .await
        .user_facing()?;
    workspace.close()?;
    Ok(summary)
}

pub async fn run_add(global: &GlobalArgs, args: &AddArgs) -> Result<PlacementRecord> {
    let mut workspace = Workspace::open(global).await?;
    let options = NormalizeOptions::default();
    let values = args
        .set
        .iter()
        .map(|Assignment { column, value }| {
            let key = resolve_column(workspace.editor().columns(), column)?;
            let value = coerce_cell(&key, value, &options);
            Ok((key, value))
        })
        .collect::<Result<Vec<_>>>()?;
    let session = workspace.context.session().clone();
    let record = workspace
        .context
        .editor_mut()
        .add_record(&workspace.store, &session, current_year(), &values)
        .await
        .user_facing()?;
    workspace.close()?;
    Ok(record)
}

pub async fn run_delete(global: &GlobalArgs, args: &DeleteArgs) -> Result<usize> {
    let mut workspace = Workspace::open(global).await?;
    let Workspace { store, context } = &mut workspace;
    let editor = context.editor_mut();

    let deleted = if let Some(id) = &args.id {
        let id = RecordId::new(id.as_str())?;
        if !args.yes && !ask(&format!("Delete record {id}?")) {
            bail!("delete cancelled");
        }
        editor.delete_record(store, &id).await.user_facing()?;
        1
    } else {
        apply_filters(editor, &args.filter)?;
        let count = editor.view_row_count();
        if count == 0 {
            0
        } else {
            if !args.yes && !ask(&format!("Delete {count} records?")) {
                bail!("delete cancelled");
            }
            editor.delete_all_filtered(store).await.user_facing()?
        }
    };
    workspace.close()?;
    Ok(deleted)
}

// ============================================================================
// Export
// ============================================================================

pub async fn run_export(global: &GlobalArgs, args: &ExportArgs) -> Result<ExportSummary> {
    let mut workspace = Workspace::open(global).await?;
    apply_filters(workspace.context.editor_mut(), &args.filter)?;
    let options = ExportOptions::new()
        .with_serial_column(!args.no_serial)
        .with_flatten(args.flatten)
        .with_group_by_offer_type(args.by_offer_type);
    let path = export_path(&args.out, args.format, &options);

    let editor = workspace.editor();
    let columns = view_column_set(editor)?;
    let records = editor.view_records();
    let summary = pcell_export::export_records(&records, &columns, &path, &options).user_facing()?;
    workspace.close()?;
    Ok(summary)
}

fn export_path(out: &Path, format: ExportFormatArg, options: &ExportOptions) -> PathBuf {
    if !out.is_dir() {
        return out.to_path_buf();
    }
    let format = match format {
        ExportFormatArg::Xlsx => ExportFormat::Xlsx,
        ExportFormatArg::Csv => ExportFormat::Csv,
    };
    out.join(default_file_name(options, format, Local::now().date_naive()))
}

/// The layout with columns outside the current view hidden.
fn view_column_set(editor: &GridEditor) -> Result<ColumnSet> {
    let mut columns = editor.columns().clone();
    let shown = editor.view_columns();
    let dropped: Vec<ColumnKey> = columns
        .visible_keys()
        .into_iter()
        .filter(|key| !shown.contains(key))
        .collect();
    for key in &dropped {
        columns.hide(key)?;
    }
    Ok(columns)
}

// ============================================================================
// Master data
// ============================================================================

pub async fn run_master(global: &GlobalArgs, command: &MasterCommand) -> Result<()> {
    let workspace = Workspace::open(global).await?;
    match command {
        MasterCommand::Import { kind, paths, yes } => {
            let confirm: &dyn ConfirmImport = if *yes { &AlwaysConfirm } else { &StdinConfirm };
            let outcome = pcell_import::import_master(
                &workspace.store,
                master_kind(*kind),
                &ImportSource::Files(paths.clone()),
                &NormalizeOptions::default(),
                confirm,
            )
            .await
            .user_facing()?;
            print_master_import(master_kind(*kind), &outcome);
        }
        MasterCommand::List { kind, search } => {
            let needle = search.as_deref().map(master_key).unwrap_or_default();
            let hit = |values: [&str; 2]| values.iter().any(|value| master_key(value).contains(&needle));
            match kind {
                MasterKindArg::Students => {
                    let mut students = workspace.store.list_master_students().await.user_facing()?;
                    students.retain(|s| hit([s.student_id.as_str(), s.student_name.as_str()]));
                    print_master_students(&students);
                }
                MasterKindArg::Companies => {
                    let mut companies = workspace.store.list_master_companies().await.user_facing()?;
                    companies.retain(|c| hit([c.name.as_str(), c.hr_name.as_str()]));
                    print_master_companies(&companies);
                }
            }
        }
        MasterCommand::Delete { kind, keys, yes } => {
            let kind = master_kind(*kind);
            if !yes && !ask(&format!("Delete {} master {kind}?", keys.len())) {
                bail!("delete cancelled");
            }
            let removed = match kind {
                MasterKind::Students => workspace.store.delete_master_students(keys).await,
                MasterKind::Companies => workspace.store.delete_master_companies(keys).await,
            }
            .user_facing()?;
            info!(kind = kind.as_str(), removed, "deleted master entries");
            println!("Removed {removed} master {kind}");
        }
    }
    workspace.close()
}

fn master_kind(kind: MasterKindArg) -> MasterKind {
    match kind {
        MasterKindArg::Students => MasterKind::Students,
        MasterKindArg::Companies => MasterKind::Companies,
    }
}

