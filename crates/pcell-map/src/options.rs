//! Configuration for row normalization.

use chrono::{Datelike, NaiveDate};
use pcell_model::FieldKey;

/// Spreadsheet date system used to interpret numeric date cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SerialEpoch {
    /// Windows Excel: day 25569 is 1970-01-01.
    #[default]
    Excel1900,
    /// Legacy Mac Excel: day 24107 is 1970-01-01.
    Excel1904,
}

impl SerialEpoch {
    /// Serial day number of the Unix epoch.
    pub fn unix_epoch_serial(self) -> f64 {
        match self {
            Self::Excel1900 => 25569.0,
            Self::Excel1904 => 24107.0,
        }
    }
}

/// What to store when a date cell cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFallback {
    /// Keep the trimmed source text.
    #[default]
    Raw,
    /// Substitute today's date.
    Today,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Date system for numeric date cells.
    pub epoch: SerialEpoch,
    /// Value stored for date cells that cannot be parsed.
    pub date_fallback: DateFallback,
    /// Field that must be non-empty for a row to count as a record.
    pub identity_field: FieldKey,
    /// Fixed "today"; `None` reads the local clock.
    pub today: Option<NaiveDate>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            epoch: SerialEpoch::default(),
            date_fallback: DateFallback::default(),
            identity_field: FieldKey::StudentName,
            today: None,
        }
    }
}

impl NormalizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_epoch(mut self, epoch: SerialEpoch) -> Self {
        self.epoch = epoch;
        self
    }

    pub fn with_date_fallback(mut self, fallback: DateFallback) -> Self {
        self.date_fallback = fallback;
        self
    }

    pub fn with_identity_field(mut self, field: FieldKey) -> Self {
        self.identity_field = field;
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Default for the year field.
    pub fn default_year(&self) -> i32 {
        self.today().year()
    }
}
