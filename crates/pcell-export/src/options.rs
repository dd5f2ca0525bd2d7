//! Export targets and layout switches.

use std::path::Path;

use chrono::NaiveDate;

/// Output file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "xlsx" => Some(Self::Xlsx),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

/// Layout of the exported sheet. Column order and visibility come from the
/// column set passed alongside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Prepend a 1-based "S.No" column.
    pub serial_column: bool,
    /// Add every `other_details` key that is not already a column.
    pub flatten_other_details: bool,
    /// Add one sheet per offer type after "All Records" (workbooks only).
    pub group_by_offer_type: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            serial_column: true,
            flatten_other_details: false,
            group_by_offer_type: false,
        }
    }
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_serial_column(mut self, serial_column: bool) -> Self {
        self.serial_column = serial_column;
        self
    }

    pub fn with_flatten(mut self, flatten: bool) -> Self {
        self.flatten_other_details = flatten;
        self
    }

    pub fn with_group_by_offer_type(mut self, group: bool) -> Self {
        self.group_by_offer_type = group;
        self
    }
}

/// Dated file name used when the caller gives a directory.
pub fn default_file_name(options: &ExportOptions, format: ExportFormat, today: NaiveDate) -> String {
    let stem = if options.group_by_offer_type && format == ExportFormat::Xlsx {
        "Multiple_Export"
    } else {
        "Placement_Records"
    };
    format!("{stem}_{}.{}", today.format("%Y-%m-%d"), format.extension())
}
