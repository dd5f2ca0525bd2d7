//! Bulk import pipeline with explicit stages.
//!
//! 1. **Read**: spreadsheet files (every sheet) or clipboard text
//! 2. **Normalize**: map headers and coerce values, dropping invalid rows
//! 3. **Confirm**: large imports need user approval
//! 4. **Enrich**: fill gaps from master student/company data
//! 5. **Submit**: batched sequential inserts or one bulk insert

use std::path::PathBuf;

use tracing::{Instrument, info, info_span, warn};

use pcell_ingest::{SheetTable, expand_paths, parse_clipboard, read_workbook};
use pcell_map::{FieldMap, NormalizedRecord, normalize_rows};
use pcell_model::{ColumnSet, PlacementRecord};
use pcell_store::RecordStore;

use crate::confirm::{ConfirmImport, ImportPrompt};
use crate::enrich::enrich_records;
use crate::error::{ImportError, Result};
use crate::options::{ImportOptions, InsertMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    /// Files and/or directories of spreadsheets.
    Files(Vec<PathBuf>),
    /// Tab-separated text with a header row.
    Clipboard(String),
}

/// Counts reported after a completed import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Records the store accepted.
    pub inserted: usize,
    /// Blank, banner, repeated-header and nameless rows.
    pub discarded: usize,
    /// Records that gained at least one value from master data.
    pub enriched: usize,
    /// Insert requests sent.
    pub batches: usize,
    /// File or sheet labels that contributed rows.
    pub sources: Vec<String>,
}

/// Result of the read and normalize stages.
#[derive(Debug, Clone)]
pub struct PreparedImport {
    pub records: Vec<NormalizedRecord>,
    /// Rows dropped during normalization.
    pub discarded: usize,
    pub sources: Vec<String>,
}

// ============================================================================
// Stage 1: Read
// ============================================================================

pub fn read_source(source: &ImportSource) -> Result<Vec<SheetTable>> {
    match source {
        ImportSource::Clipboard(text) => Ok(vec![parse_clipboard(text)?]),
        ImportSource::Files(paths) => {
            let mut tables = Vec::new();
            for path in expand_paths(paths)? {
                tables.extend(read_workbook(&path)?);
            }
            Ok(tables)
        }
    }
}

// ============================================================================
// Stage 2: Normalize
// ============================================================================

pub fn prepare(
    tables: &[SheetTable],
    columns: &ColumnSet,
    options: &ImportOptions,
) -> Result<PreparedImport> {
    let map = FieldMap::build(columns);
    let rows: Vec<_> = tables.iter().flat_map(SheetTable::source_rows).collect();
    let (records, discarded) = normalize_rows(&rows, &map, &options.normalize);
    let sources = tables.iter().map(SheetTable::label).collect();
    info!(
        rows = rows.len(),
        records = records.len(),
        discarded,
        "normalized rows"
    );
    if records.is_empty() {
        return Err(ImportError::NoValidRows { discarded });
    }
    Ok(PreparedImport {
        records,
        discarded,
        sources,
    })
}

// ============================================================================
// Stage 5: Submit
// ============================================================================

/// Inserts `records` according to `options.insert_mode`; returns the number
/// stored and the number of store calls made.
pub async fn submit<S: RecordStore>(
    store: &S,
    records: Vec<PlacementRecord>,
    options: &ImportOptions,
) -> Result<(usize, usize)> {
    let total = records.len();
    match options.insert_mode {
        InsertMode::Atomic => {
            let inserted = store
                .bulk_insert(records)
                .await
                .map_err(|source| ImportError::Remote { source })?;
            Ok((inserted, 1))
        }
        InsertMode::Sequential => {
            let batch_size = options.batch_size.max(1);
            let mut committed = 0usize;
            let mut batches = 0usize;
            for batch in records.chunks(batch_size) {
                batches += 1;
                match store.insert_many(batch.to_vec()).await {
                    Ok(inserted) => {
                        committed += inserted;
                        info!(batch = batches, rows = batch.len(), committed, "inserted batch");
                    }
                    Err(source) => {
                        warn!(batch = batches, committed, total, error = %source, "batch insert failed");
                        return Err(ImportError::PartialImport {
                            committed,
                            total,
                            source,
                        });
                    }
                }
            }
            Ok((committed, batches))
        }
    }
}

/// Runs the whole pipeline against `store`.
pub async fn run_import<S, C>(
    store: &S,
    columns: &ColumnSet,
    source: &ImportSource,
    options: &ImportOptions,
    confirm: &C,
) -> Result<ImportOutcome>
where
    S: RecordStore,
    C: ConfirmImport + ?Sized,
{
    let tables = info_span!("read").in_scope(|| read_source(source))?;
    let PreparedImport {
        mut records,
        discarded,
        sources,
    } = info_span!("normalize").in_scope(|| prepare(&tables, columns, options))?;

    if records.len() > options.confirm_threshold {
        let prompt = ImportPrompt {
            rows: records.len(),
            discarded,
            sources: sources.clone(),
        };
        if !confirm.confirm(&prompt) {
            info!(rows = records.len(), "import declined");
            return Err(ImportError::Declined {
                rows: records.len(),
            });
        }
    }

    let enriched = if options.enrich {
        match enrich_records(store, &mut records)
            .instrument(info_span!("enrich"))
            .await
        {
            Ok(count) => count,
            Err(error) => {
                warn!(error = %error, "master data lookup failed; importing without enrichment");
                0
            }
        }
    } else {
        0
    };

    let records: Vec<PlacementRecord> = records.into_iter().map(|r| r.record).collect();
    let (inserted, batches) = submit(store, records, options)
        .instrument(info_span!("submit", mode = ?options.insert_mode))
        .await?;

    info!(inserted, discarded, batches, "import complete");
    Ok(ImportOutcome {
        inserted,
        discarded,
        enriched,
        batches,
        sources,
    })
}
