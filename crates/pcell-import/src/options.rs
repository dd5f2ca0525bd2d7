//! Import configuration.

use pcell_map::NormalizeOptions;

pub const DEFAULT_BATCH_SIZE: usize = 50;
pub const DEFAULT_CONFIRM_THRESHOLD: usize = 10;

/// How normalized records are submitted to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertMode {
    /// Batches are inserted one after another; a failing batch stops the
    /// import and earlier batches stay stored.
    #[default]
    Sequential,
    /// The whole set goes through the store's bulk insert, all-or-nothing.
    Atomic,
}

/// Settings for one import run.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Records per insert request in [`InsertMode::Sequential`]. At least 1.
    pub batch_size: usize,
    /// Imports with more rows than this ask for confirmation.
    pub confirm_threshold: usize,
    pub insert_mode: InsertMode,
    /// Fill empty fields from master student/company data.
    pub enrich: bool,
    /// Date handling and the identity field for row normalization.
    pub normalize: NormalizeOptions,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            confirm_threshold: DEFAULT_CONFIRM_THRESHOLD,
            insert_mode: InsertMode::default(),
            enrich: true,
            normalize: NormalizeOptions::default(),
        }
    }
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_confirm_threshold(mut self, threshold: usize) -> Self {
        self.confirm_threshold = threshold;
        self
    }

    pub fn with_insert_mode(mut self, mode: InsertMode) -> Self {
        self.insert_mode = mode;
        self
    }

    pub fn with_enrich(mut self, enrich: bool) -> Self {
        self.enrich = enrich;
        self
    }

    pub fn with_normalize(mut self, normalize: NormalizeOptions) -> Self {
        self.normalize = normalize;
        self
    }
}
