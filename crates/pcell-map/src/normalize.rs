//! Row normalization: one source row in, one candidate record out.

use std::collections::{BTreeMap, BTreeSet};

use pcell_model::{
    ColumnKey, FieldKey, FieldValue, PlacementRecord, SourceRow, normalize_key,
};

use crate::coerce::coerce_value;
use crate::engine::{FieldMap, MatchKind};
use crate::offer::canonical_offer_type;
use crate::options::NormalizeOptions;
use crate::patterns::BANNER_PHRASES;

/// Banner rows carry at most this many non-empty cells.
const BANNER_MAX_CELLS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub record: PlacementRecord,
    /// Built-in fields that received a non-empty source value.
    pub filled: BTreeSet<FieldKey>,
    /// Source header that claimed each column, with the matcher used.
    pub matches: BTreeMap<ColumnKey, (String, MatchKind)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscardReason {
    Blank,
    Banner,
    RepeatedHeader,
    MissingIdentity,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NormalizeOutcome {
    Record(NormalizedRecord),
    Discarded(DiscardReason),
}

impl NormalizeOutcome {
    pub fn into_record(self) -> Option<NormalizedRecord> {
        match self {
            Self::Record(record) => Some(record),
            Self::Discarded(_) => None,
        }
    }
}

/// Maps one source row onto a placement record.
///
/// Headers are visited in source order; the first header that resolves to
/// a column claims it and later headers resolving to the same column are
/// ignored. Missing or unparseable values degrade to field defaults.
pub fn normalize_row(
    row: &SourceRow,
    map: &FieldMap,
    options: &NormalizeOptions,
) -> NormalizeOutcome {
    if row.is_blank() {
        return NormalizeOutcome::Discarded(DiscardReason::Blank);
    }
    if is_repeated_header(row) {
        return NormalizeOutcome::Discarded(DiscardReason::RepeatedHeader);
    }

    let mut record = PlacementRecord::blank(options.default_year());
    let mut filled = BTreeSet::new();
    let mut matches: BTreeMap<ColumnKey, (String, MatchKind)> = BTreeMap::new();

    for (header, raw) in &row.cells {
        let Some(resolution) = map.resolve(header) else {
            continue;
        };
        if matches.contains_key(&resolution.target) {
            continue;
        }
        matches.insert(
            resolution.target.clone(),
            (header.clone(), resolution.kind),
        );

        match &resolution.target {
            ColumnKey::BuiltIn(field) => {
                let value = match coerce_value(field.kind(), raw, options) {
                    FieldValue::Text(text) if *field == FieldKey::OfferType => {
                        FieldValue::Text(canonical_offer_type(&text))
                    }
                    value => value,
                };
                record.set_value(*field, value);
                if !raw.is_empty() {
                    filled.insert(*field);
                }
            }
            ColumnKey::Custom(name) => {
                let text = raw.to_text();
                if !text.is_empty() {
                    record.other_details.insert(name.clone(), text);
                }
            }
        }
    }

    let identity = record.value(options.identity_field).to_string();
    if is_banner_row(row, identity.trim()) {
        return NormalizeOutcome::Discarded(DiscardReason::Banner);
    }
    if identity.trim().is_empty() {
        return NormalizeOutcome::Discarded(DiscardReason::MissingIdentity);
    }

    NormalizeOutcome::Record(NormalizedRecord {
        record,
        filled,
        matches,
    })
}

/// Normalizes every row, keeping records and counting discards.
pub fn normalize_rows<'a>(
    rows: impl IntoIterator<Item = &'a SourceRow>,
    map: &FieldMap,
    options: &NormalizeOptions,
) -> (Vec<NormalizedRecord>, usize) {
    let mut records = Vec::new();
    let mut discarded = 0usize;
    for row in rows {
        match normalize_row(row, map, options) {
            NormalizeOutcome::Record(record) => records.push(record),
            NormalizeOutcome::Discarded(reason) => {
                tracing::trace!(?reason, "discarded source row");
                discarded += 1;
            }
        }
    }
    (records, discarded)
}

/// A title or section row: few cells, one of them a banner phrase. A row
/// whose identity holds an ordinary value is a record, whatever else it says.
fn is_banner_row(row: &SourceRow, identity: &str) -> bool {
    if row.non_empty_count() > BANNER_MAX_CELLS {
        return false;
    }
    if !identity.is_empty() && !has_banner_phrase(identity) {
        return false;
    }
    row.cells
        .iter()
        .any(|(_, value)| has_banner_phrase(&value.to_text()))
}

/// Whole-word phrase match: "Total" and "List of students" match,
/// "TotalEnergies" does not.
fn has_banner_phrase(text: &str) -> bool {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect();
    if words.is_empty() {
        return false;
    }
    let padded = format!(" {} ", words.join(" "));
    BANNER_PHRASES
        .iter()
        .any(|phrase| padded.contains(&format!(" {phrase} ")))
}

/// A header row repeated inside the data, e.g. between pasted sections.
fn is_repeated_header(row: &SourceRow) -> bool {
    let non_empty = row.non_empty_count();
    if non_empty < 2 {
        return false;
    }
    let echoed = row
        .cells
        .iter()
        .filter(|(header, value)| {
            let text = normalize_key(&value.to_text());
            !text.is_empty() && text == normalize_key(header)
        })
        .count();
    echoed * 2 >= non_empty
}
