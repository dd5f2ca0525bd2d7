//! Column definitions and the ordered, user-editable column layout.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::FieldKey;
use crate::text::{custom_column_key, normalize_key};
use crate::{ModelError, Result};

/// Identifies a grid column: either a built-in record field or a custom
/// column stored in `other_details`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKey {
    BuiltIn(FieldKey),
    Custom(String),
}

impl ColumnKey {
    /// Resolves a storage key string, falling back to a custom column.
    pub fn parse(key: &str) -> Self {
        match FieldKey::from_key(key) {
            Some(field) => Self::BuiltIn(field),
            None => Self::Custom(key.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::BuiltIn(field) => field.as_str(),
            Self::Custom(name) => name,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    pub fn field(&self) -> Option<FieldKey> {
        match self {
            Self::BuiltIn(field) => Some(*field),
            Self::Custom(_) => None,
        }
    }
}

impl From<FieldKey> for ColumnKey {
    fn from(field: FieldKey) -> Self {
        Self::BuiltIn(field)
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub key: ColumnKey,
    pub label: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl ColumnDefinition {
    pub fn built_in(field: FieldKey) -> Self {
        Self {
            key: ColumnKey::BuiltIn(field),
            label: field.label().to_string(),
            visible: true,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.key.is_custom()
    }
}

/// Ordered column layout.
///
/// Keys are unique. Columns are never removed, only hidden, so a hidden
/// column can always be restored with its label intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnSet {
    columns: Vec<ColumnDefinition>,
}

impl Default for ColumnSet {
    fn default() -> Self {
        Self::defaults()
    }
}

impl ColumnSet {
    /// Every built-in field, visible, in display order.
    pub fn defaults() -> Self {
        Self {
            columns: FieldKey::ALL
                .into_iter()
                .map(ColumnDefinition::built_in)
                .collect(),
        }
    }

    /// Only the listed built-in fields, visible, in the given order.
    pub fn built_ins(fields: &[FieldKey]) -> Self {
        Self {
            columns: fields
                .iter()
                .copied()
                .map(ColumnDefinition::built_in)
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.columns.iter()
    }

    pub fn get(&self, key: &ColumnKey) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|column| &column.key == key)
    }

    pub fn contains(&self, key: &ColumnKey) -> bool {
        self.get(key).is_some()
    }

    /// Visible columns in layout order.
    pub fn visible(&self) -> Vec<&ColumnDefinition> {
        self.columns.iter().filter(|column| column.visible).collect()
    }

    pub fn visible_keys(&self) -> Vec<ColumnKey> {
        self.visible()
            .into_iter()
            .map(|column| column.key.clone())
            .collect()
    }

    /// Looks a column up by storage key or label, ignoring case and
    /// punctuation.
    pub fn find_by_key_str(&self, text: &str) -> Option<&ColumnDefinition> {
        let wanted = normalize_key(text);
        if wanted.is_empty() {
            return None;
        }
        self.columns
            .iter()
            .find(|column| column.key.as_str().eq_ignore_ascii_case(text.trim()))
            .or_else(|| {
                self.columns.iter().find(|column| {
                    normalize_key(column.key.as_str()) == wanted
                        || normalize_key(&column.label) == wanted
                })
            })
    }

    /// Appends a visible custom column and returns its key.
    pub fn add_custom(&mut self, name: &str) -> Result<ColumnKey> {
        let label = name.trim();
        if label.is_empty() {
            return Err(ModelError::EmptyColumnName);
        }
        let key = custom_column_key(label);
        let normalized = normalize_key(label);
        let clashes = self.columns.iter().any(|column| {
            column.key.as_str() == key
                || normalize_key(column.key.as_str()) == normalized
                || normalize_key(&column.label) == normalized
        });
        if clashes {
            return Err(ModelError::DuplicateColumn(label.to_string()));
        }
        let key = ColumnKey::Custom(key);
        self.columns.push(ColumnDefinition {
            key: key.clone(),
            label: label.to_string(),
            visible: true,
        });
        Ok(key)
    }

    pub fn rename(&mut self, key: &ColumnKey, label: &str) -> Result<()> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ModelError::EmptyColumnName);
        }
        let column = self.get_mut(key)?;
        column.label = label.to_string();
        Ok(())
    }

    pub fn hide(&mut self, key: &ColumnKey) -> Result<()> {
        self.get_mut(key)?.visible = false;
        Ok(())
    }

    pub fn unhide(&mut self, key: &ColumnKey) -> Result<()> {
        self.get_mut(key)?.visible = true;
        Ok(())
    }

    /// Reconciles a saved layout with the current built-in fields.
    ///
    /// Saved order, labels and visibility are kept; duplicate keys keep their
    /// first occurrence; built-ins missing from the saved layout are appended.
    pub fn merge_with_defaults(saved: ColumnSet) -> ColumnSet {
        let mut merged: Vec<ColumnDefinition> = Vec::with_capacity(saved.len());
        for column in saved.columns {
            if merged.iter().any(|existing| existing.key == column.key) {
                continue;
            }
            merged.push(column);
        }
        for field in FieldKey::ALL {
            let key = ColumnKey::BuiltIn(field);
            if !merged.iter().any(|column| column.key == key) {
                merged.push(ColumnDefinition::built_in(field));
            }
        }
        ColumnSet { columns: merged }
    }

    fn get_mut(&mut self, key: &ColumnKey) -> Result<&mut ColumnDefinition> {
        self.columns
            .iter_mut()
            .find(|column| &column.key == key)
            .ok_or_else(|| ModelError::UnknownColumn(key.to_string()))
    }
}

impl<'a> IntoIterator for &'a ColumnSet {
    type Item = &'a ColumnDefinition;
    type IntoIter = std::slice::Iter<'a, ColumnDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_custom_rejects_clash_with_builtin_label() {
        let mut columns = ColumnSet::defaults();
        assert_eq!(
            columns.add_custom("company name"),
            Err(ModelError::DuplicateColumn("company name".to_string()))
        );
        assert_eq!(columns.add_custom("  "), Err(ModelError::EmptyColumnName));
    }

    #[test]
    fn add_custom_uses_slug_key() {
        let mut columns = ColumnSet::defaults();
        let key = columns.add_custom("Bond Period").expect("add column");
        assert_eq!(key, ColumnKey::Custom("bond_period".to_string()));
        assert_eq!(columns.get(&key).map(|c| c.label.as_str()), Some("Bond Period"));
    }

    #[test]
    fn merge_appends_missing_builtins() {
        let mut saved = ColumnSet::defaults();
        saved.columns.retain(|column| column.key != ColumnKey::BuiltIn(FieldKey::RefNo));
        saved.columns.push(saved.columns[0].clone());
        let merged = ColumnSet::merge_with_defaults(saved);
        assert_eq!(merged.len(), FieldKey::ALL.len());
        assert_eq!(
            merged.iter().last().map(|c| c.key.clone()),
            Some(ColumnKey::BuiltIn(FieldKey::RefNo))
        );
    }

    #[test]
    fn find_by_label_or_key() {
        let columns = ColumnSet::defaults();
        let by_label = columns.find_by_key_str("Package (LPA)").map(|c| c.key.clone());
        let by_key = columns.find_by_key_str("package_lpa").map(|c| c.key.clone());
        assert_eq!(by_label, Some(ColumnKey::BuiltIn(FieldKey::PackageLpa)));
        assert_eq!(by_label, by_key);
        assert!(columns.find_by_key_str("nothing here").is_none());
    }
}
