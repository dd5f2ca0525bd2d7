//! Flattening records into a header row plus typed cells.

use std::collections::{BTreeMap, BTreeSet};

use pcell_map::canonical_offer_type;
use pcell_model::{ColumnKey, ColumnSet, FieldValue, PlacementRecord};

use crate::options::ExportOptions;

pub const SERIAL_HEADER: &str = "S.No";
pub const ALL_RECORDS_SHEET: &str = "All Records";
pub const SINGLE_SHEET: &str = "Placement Records";
/// Sheet for records without an offer type.
pub const UNSPECIFIED_OFFER: &str = "Other";

const MAX_SHEET_NAME: usize = 31;

#[derive(Debug, Clone, PartialEq)]
pub enum ExportCell {
    Text(String),
    Number(f64),
}

impl ExportCell {
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(value) => pcell_model::format_number(*value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<ExportCell>>,
}

/// A named sheet of an export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSheet {
    pub name: String,
    pub table: ExportTable,
}

enum Source {
    Column(ColumnKey),
    Detail(String),
}

/// Builds the table for `records` using the visible columns of `columns`.
pub fn build_table(
    records: &[&PlacementRecord],
    columns: &ColumnSet,
    options: &ExportOptions,
) -> ExportTable {
    let mut headers = Vec::new();
    let mut sources = Vec::new();
    if options.serial_column {
        headers.push(SERIAL_HEADER.to_string());
    }
    for definition in columns.visible() {
        headers.push(definition.label.clone());
        sources.push(Source::Column(definition.key.clone()));
    }
    if options.flatten_other_details {
        let known: BTreeSet<&str> = columns
            .iter()
            .filter_map(|definition| match &definition.key {
                ColumnKey::Custom(name) => Some(name.as_str()),
                ColumnKey::BuiltIn(_) => None,
            })
            .collect();
        let extra: BTreeSet<&str> = records
            .iter()
            .flat_map(|record| record.other_details.keys())
            .map(String::as_str)
            .filter(|key| !known.contains(key))
            .collect();
        for key in extra {
            headers.push(key.to_string());
            sources.push(Source::Detail(key.to_string()));
        }
    }

    let rows = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let mut row = Vec::with_capacity(headers.len());
            if options.serial_column {
                row.push(ExportCell::Number((index + 1) as f64));
            }
            row.extend(sources.iter().map(|source| cell(record, source)));
            row
        })
        .collect();

    ExportTable { headers, rows }
}

fn cell(record: &PlacementRecord, source: &Source) -> ExportCell {
    match source {
        Source::Column(ColumnKey::BuiltIn(field)) => match record.value(*field) {
            FieldValue::Integer(value) => ExportCell::Number(value as f64),
            FieldValue::Number(value) => ExportCell::Number(value),
            FieldValue::Text(text) => ExportCell::Text(text),
        },
        Source::Column(key) => ExportCell::Text(record.cell_text(key)),
        Source::Detail(name) => {
            ExportCell::Text(record.other_details.get(name).cloned().unwrap_or_default())
        }
    }
}

/// Sheets for a workbook export: one sheet, or "All Records" followed by a
/// sheet per offer type in name order.
pub fn build_sheets(
    records: &[&PlacementRecord],
    columns: &ColumnSet,
    options: &ExportOptions,
) -> Vec<ExportSheet> {
    if !options.group_by_offer_type {
        return vec![ExportSheet {
            name: SINGLE_SHEET.to_string(),
            table: build_table(records, columns, options),
        }];
    }

    let mut groups: BTreeMap<String, Vec<&PlacementRecord>> = BTreeMap::new();
    for record in records {
        let offer = canonical_offer_type(&record.offer_type);
        let offer = if offer.is_empty() {
            UNSPECIFIED_OFFER.to_string()
        } else {
            offer
        };
        groups.entry(offer).or_default().push(*record);
    }

    let mut sheets = vec![ExportSheet {
        name: ALL_RECORDS_SHEET.to_string(),
        table: build_table(records, columns, options),
    }];
    let mut used: BTreeSet<String> = BTreeSet::from([ALL_RECORDS_SHEET.to_lowercase()]);
    for (offer, group) in groups {
        let name = unique_sheet_name(&format!("{offer} Records"), &mut used);
        sheets.push(ExportSheet {
            name,
            table: build_table(&group, columns, options),
        });
    }
    sheets
}

/// Excel sheet names: at most 31 characters, no `[]:*?/\`.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if "[]:*?/\\".contains(c) { '-' } else { c })
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'');
    let truncated: String = cleaned.chars().take(MAX_SHEET_NAME).collect();
    if truncated.trim().is_empty() {
        "Sheet".to_string()
    } else {
        truncated
    }
}

/// Sheet names must also be unique ignoring case.
fn unique_sheet_name(name: &str, used: &mut BTreeSet<String>) -> String {
    let base = sanitize_sheet_name(name);
    let mut candidate = base.clone();
    let mut counter = 2;
    while !used.insert(candidate.to_lowercase()) {
        let suffix = format!(" ({counter})");
        let keep = MAX_SHEET_NAME.saturating_sub(suffix.chars().count());
        candidate = format!("{}{suffix}", base.chars().take(keep).collect::<String>());
        counter += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_names_are_cleaned() {
        assert_eq!(sanitize_sheet_name("Internship/PPO Records"), "Internship-PPO Records");
        assert_eq!(
            sanitize_sheet_name("A very long offer type name that overflows"),
            "A very long offer type name tha"
        );
        assert_eq!(sanitize_sheet_name("  "), "Sheet");
    }

    #[test]
    fn duplicate_sheet_names_get_suffix() {
        let mut used = BTreeSet::new();
        assert_eq!(unique_sheet_name("Direct Records", &mut used), "Direct Records");
        assert_eq!(unique_sheet_name("direct records", &mut used), "direct records (2)");
    }
}
