//! Master list import: read, map, confirm, upsert.
//!
//! Master students and companies feed enrichment of placement imports.
//! Rows are upserted by register number or company name, so re-importing
//! an updated list replaces the old entries.

use std::fmt;

use tracing::{Instrument, info, info_span};

use pcell_ingest::SheetTable;
use pcell_map::{NormalizeOptions, master_companies_from_rows, master_students_from_rows};
use pcell_model::{MasterCompany, MasterStudent};
use pcell_store::RecordStore;

use crate::confirm::{ConfirmImport, ImportPrompt};
use crate::error::{ImportError, Result};
use crate::pipeline::{ImportSource, read_source};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterKind {
    Students,
    Companies,
}

impl MasterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Students => "students",
            Self::Companies => "companies",
        }
    }
}

impl fmt::Display for MasterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasterImportOutcome {
    /// Rows inserted or replaced.
    pub upserted: usize,
    pub discarded: usize,
    pub sources: Vec<String>,
}

/// Imports a master list. Every import is confirmed, whatever its size.
pub async fn import_master<S, C>(
    store: &S,
    kind: MasterKind,
    source: &ImportSource,
    options: &NormalizeOptions,
    confirm: &C,
) -> Result<MasterImportOutcome>
where
    S: RecordStore,
    C: ConfirmImport + ?Sized,
{
    let span = info_span!("master_import", kind = kind.as_str());
    let tables = span.in_scope(|| read_source(source))?;
    let rows: Vec<_> = tables.iter().flat_map(SheetTable::source_rows).collect();
    let sources: Vec<String> = tables.iter().map(SheetTable::label).collect();

    let (count, discarded, upsert) = match kind {
        MasterKind::Students => {
            let read = master_students_from_rows(&rows, options);
            let count = read.rows.len();
            (count, read.discarded, Upsert::Students(read.rows))
        }
        MasterKind::Companies => {
            let read = master_companies_from_rows(&rows, options);
            let count = read.rows.len();
            (count, read.discarded, Upsert::Companies(read.rows))
        }
    };
    info!(kind = kind.as_str(), rows = count, discarded, "read master rows");
    if count == 0 {
        return Err(ImportError::NoValidMasterRows { kind, discarded });
    }

    let prompt = ImportPrompt {
        rows: count,
        discarded,
        sources: sources.clone(),
    };
    if !confirm.confirm(&prompt) {
        info!(rows = count, "master import declined");
        return Err(ImportError::Declined { rows: count });
    }

    let result = match upsert {
        Upsert::Students(students) => store.upsert_master_students(students).instrument(span).await,
        Upsert::Companies(companies) => {
            store.upsert_master_companies(companies).instrument(span).await
        }
    };
    let upserted = result.map_err(|source| ImportError::MasterUpsert { kind, source })?;
    info!(kind = kind.as_str(), upserted, "master import complete");
    Ok(MasterImportOutcome {
        upserted,
        discarded,
        sources,
    })
}

enum Upsert {
    Students(Vec<MasterStudent>),
    Companies(Vec<MasterCompany>),
}
