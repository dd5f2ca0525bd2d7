//! Terminal output for command results.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pcell_export::{ExportFormat, ExportSummary};
use pcell_grid::{CellAddr, GridEditor, SaveSummary};
use pcell_import::{ImportOutcome, MasterImportOutcome, MasterKind};
use pcell_model::{ColumnSet, MasterCompany, MasterStudent, PlacementRecord};

pub fn print_import(outcome: &ImportOutcome) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Import"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Inserted"),
        count_cell(outcome.inserted, Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Skipped rows"),
        count_cell(outcome.discarded, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Enriched from master data"),
        count_cell(outcome.enriched, Color::Blue),
    ]);
    table.add_row(vec![Cell::new("Requests"), dim_cell(outcome.batches)]);
    println!("{table}");
    if !outcome.sources.is_empty() {
        println!("Sources: {}", outcome.sources.join(", "));
    }
}

/// Prints the filtered view with staged values, one numbered row per record.
pub fn print_records(editor: &GridEditor, with_ids: bool) {
    let columns = editor.view_columns();
    let mut headers = vec![header_cell("#")];
    if with_ids {
        headers.push(header_cell("ID"));
    }
    headers.extend(columns.iter().map(|key| {
        let label = editor
            .columns()
            .get(key)
            .map_or(key.as_str(), |column| column.label.as_str());
        header_cell(label)
    }));

    let mut table = Table::new();
    table.set_header(headers);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for row in 0..editor.view_row_count() {
        let mut cells = vec![dim_cell(row + 1)];
        if with_ids {
            let id = editor
                .record_at(row)
                .and_then(|record| record.id.as_ref())
                .map_or_else(String::new, ToString::to_string);
            cells.push(dim_cell(id));
        }
        cells.extend((0..columns.len()).map(|col| {
            Cell::new(
                editor
                    .display_text(CellAddr::new(row, col))
                    .unwrap_or_default(),
            )
        }));
        table.add_row(cells);
    }
    println!("{table}");
    println!("{}", editor.row_count());
}

pub fn print_columns(columns: &ColumnSet) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Key"),
        header_cell("Label"),
        header_cell("Kind"),
        header_cell("Visible"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for (index, column) in columns.iter().enumerate() {
        let kind = if column.is_custom() {
            Cell::new("custom").fg(Color::Magenta)
        } else {
            dim_cell("built-in")
        };
        let visible = if column.visible {
            Cell::new("✓")
                .fg(Color::Green)
                .add_attribute(Attribute::Bold)
        } else {
            dim_cell("-")
        };
        table.add_row(vec![
            dim_cell(index + 1),
            Cell::new(column.key.as_str()),
            Cell::new(&column.label),
            kind,
            visible,
        ]);
    }
    println!("{table}");
}

pub fn print_export(summary: &ExportSummary) {
    if summary.format == ExportFormat::Xlsx {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Sheet"), header_cell("Rows")]);
        apply_summary_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        for (name, rows) in &summary.sheets {
            table.add_row(vec![Cell::new(name), Cell::new(rows)]);
        }
        println!("{table}");
    }
    println!(
        "Exported {} records to {}",
        summary.records,
        summary.path.display()
    );
}

pub fn print_save(summary: &SaveSummary) {
    if summary.cells == 0 {
        println!("No changes to save");
    } else {
        println!(
            "Saved {} cells across {} records",
            summary.cells, summary.records
        );
    }
    if summary.stale {
        println!("Saved, but reloading records failed; run `pcell list` to see stored values");
    }
}

pub fn print_added(record: &PlacementRecord) {
    match &record.id {
        Some(id) => println!("Added record {id}"),
        None => println!("Added record"),
    }
}

pub fn print_deleted(deleted: usize) {
    println!("Deleted {deleted} records");
}

pub fn print_master_import(kind: MasterKind, outcome: &MasterImportOutcome) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Master import"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new(format!("Saved {kind}")),
        count_cell(outcome.upserted, Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Skipped rows"),
        count_cell(outcome.discarded, Color::Yellow),
    ]);
    println!("{table}");
    if !outcome.sources.is_empty() {
        println!("Sources: {}", outcome.sources.join(", "));
    }
}

pub fn print_master_students(students: &[MasterStudent]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Register No"),
        header_cell("Name"),
        header_cell("Department"),
        header_cell("Email"),
        header_cell("Mobile"),
        header_cell("Sem"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 5, CellAlignment::Right);
    for student in students {
        table.add_row(vec![
            Cell::new(&student.student_id),
            Cell::new(&student.student_name),
            Cell::new(&student.department),
            Cell::new(&student.student_mail),
            Cell::new(&student.student_mobile),
            student.semester.map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    println!("{table}");
    println!("{} master students", students.len());
}

pub fn print_master_companies(companies: &[MasterCompany]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Company"),
        header_cell("Email"),
        header_cell("HR"),
        header_cell("HR Email"),
        header_cell("Address"),
    ]);
    apply_table_style(&mut table);
    for company in companies {
        table.add_row(vec![
            Cell::new(&company.name),
            Cell::new(&company.mail),
            Cell::new(&company.hr_name),
            Cell::new(&company.hr_mail),
            Cell::new(&company.address),
        ]);
    }
    println!("{table}");
    println!("{} master companies", companies.len());
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
