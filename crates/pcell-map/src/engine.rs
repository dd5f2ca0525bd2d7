//! Header-to-column resolution.
//!
//! A [`FieldMap`] is built once per import from the current column layout
//! and the static alias table. Resolution is an ordered pipeline:
//!
//! 1. exact match against a column label or key
//! 2. exact match against an alias
//! 3. substring containment in either direction, most specific first
//!
//! The first matcher that hits wins.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use pcell_model::{ColumnKey, ColumnSet, FieldKey, normalize_key};

use crate::patterns::{ALIASES, is_noise_header};

/// Shortest normalized string that takes part in substring matching.
pub const MIN_SUBSTRING_LEN: usize = 3;

/// Which matcher resolved a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchKind {
    Exact,
    Alias,
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Column the header maps to.
    pub target: ColumnKey,
    /// Which rule matched.
    pub kind: MatchKind,
    /// The lookup key that matched.
    pub matched: String,
}

#[derive(Debug, Clone)]
struct Candidate {
    key: String,
    target: ColumnKey,
    from_alias: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    /// Normalized column keys and labels.
    columns: BTreeMap<String, ColumnKey>,
    /// Normalized alias spellings.
    aliases: BTreeMap<String, ColumnKey>,
    /// Substring candidates, longest key first.
    candidates: Vec<Candidate>,
}

impl FieldMap {
    pub fn build(columns: &ColumnSet) -> Self {
        Self::build_with_aliases(columns, ALIASES)
    }

    /// Builds over `columns` with a custom alias table. Earlier entries win
    /// over later ones with the same spelling.
    pub fn build_with_aliases(columns: &ColumnSet, alias_table: &[(&str, FieldKey)]) -> Self {
        let mut column_keys: BTreeMap<String, ColumnKey> = BTreeMap::new();
        for column in columns {
            for text in [column.label.as_str(), column.key.as_str()] {
                let normalized = normalize_key(text);
                if normalized.is_empty() {
                    continue;
                }
                column_keys
                    .entry(normalized)
                    .or_insert_with(|| column.key.clone());
            }
        }

        let mut aliases: BTreeMap<String, ColumnKey> = BTreeMap::new();
        for (alias, field) in alias_table {
            let target = ColumnKey::BuiltIn(*field);
            if column_keys.contains_key(*alias) || !columns.contains(&target) {
                continue;
            }
            aliases.entry((*alias).to_string()).or_insert(target);
        }

        let mut candidates: Vec<Candidate> = column_keys
            .iter()
            .map(|(key, target)| (key, target, false))
            .chain(aliases.iter().map(|(key, target)| (key, target, true)))
            .filter(|(key, _, _)| key.chars().count() >= MIN_SUBSTRING_LEN)
            .map(|(key, target, from_alias)| Candidate {
                key: key.clone(),
                target: target.clone(),
                from_alias,
            })
            .collect();
        candidates.sort_by(compare_candidates);

        tracing::debug!(
            column_keys = column_keys.len(),
            aliases = aliases.len(),
            "built field map"
        );

        Self {
            columns: column_keys,
            aliases,
            candidates,
        }
    }

    /// Resolves a raw header. Noise headers never resolve.
    pub fn resolve(&self, header: &str) -> Option<Resolution> {
        let normalized = normalize_key(header);
        if normalized.is_empty() || is_noise_header(&normalized) {
            return None;
        }
        self.match_exact(&normalized)
            .or_else(|| self.match_alias(&normalized))
            .or_else(|| self.match_substring(&normalized))
    }

    fn match_exact(&self, normalized: &str) -> Option<Resolution> {
        self.columns.get(normalized).map(|target| Resolution {
            target: target.clone(),
            kind: MatchKind::Exact,
            matched: normalized.to_string(),
        })
    }

    fn match_alias(&self, normalized: &str) -> Option<Resolution> {
        self.aliases.get(normalized).map(|target| Resolution {
            target: target.clone(),
            kind: MatchKind::Alias,
            matched: normalized.to_string(),
        })
    }

    fn match_substring(&self, normalized: &str) -> Option<Resolution> {
        if normalized.chars().count() < MIN_SUBSTRING_LEN {
            return None;
        }
        self.candidates
            .iter()
            .find(|candidate| {
                normalized.contains(candidate.key.as_str()) || candidate.key.contains(normalized)
            })
            .map(|candidate| Resolution {
                target: candidate.target.clone(),
                kind: MatchKind::Substring,
                matched: candidate.key.clone(),
            })
    }
}

/// Longer keys first, then column-derived before alias, then by key.
fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    b.key
        .chars()
        .count()
        .cmp(&a.key.chars().count())
        .then_with(|| a.from_alias.cmp(&b.from_alias))
        .then_with(|| a.key.cmp(&b.key))
}
