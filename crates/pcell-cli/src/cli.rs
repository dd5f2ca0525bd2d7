//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use pcell_cli::args::{Assignment, CellAssignment, FillSpec, parse_row};
use pcell_import::DEFAULT_BATCH_SIZE;
use pcell_model::Role;

#[derive(Parser)]
#[command(
    name = "pcell",
    version,
    about = "Placement cell records - import, edit, filter and export",
    long_about = "Manage student placement records.\n\n\
                  Imports messy spreadsheets and pasted tables, edits records like a\n\
                  spreadsheet and exports filtered views to Excel or CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalArgs,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include cell values in trace logs. Off by default to keep student data
    /// out of log files.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

/// Where data lives and who is working on it.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Folder holding the record store and saved column layout.
    #[arg(
        long = "data-dir",
        env = "PCELL_DATA_DIR",
        value_name = "DIR",
        default_value = ".pcell",
        global = true
    )]
    pub data_dir: PathBuf,

    /// Signed-in user name.
    #[arg(long = "user", env = "PCELL_USER", default_value = "officer", global = true)]
    pub user: String,

    /// Role of the signed-in user.
    #[arg(
        long = "role",
        env = "PCELL_ROLE",
        default_value = "placement_officer",
        global = true
    )]
    pub role: Role,

    /// Department of a coordinator; new records default to it.
    #[arg(long = "department", env = "PCELL_DEPARTMENT", global = true)]
    pub department: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import spreadsheet files or folders of spreadsheets.
    Import(ImportArgs),

    /// Import a pasted table (tab-separated with a header row).
    Paste(PasteArgs),

    /// Show records in the filtered view.
    List(ListArgs),

    /// Export the filtered view to .xlsx or .csv.
    Export(ExportArgs),

    /// Manage columns of the record grid.
    #[command(subcommand)]
    Columns(ColumnsCommand),

    /// Stage cell edits in the grid and save them in one batch.
    Edit(EditArgs),

    /// Add one record with session defaults.
    Add(AddArgs),

    /// Delete one record or the whole filtered view.
    Delete(DeleteArgs),

    /// Manage the master student and company lists used to fill in imports.
    #[command(subcommand)]
    Master(MasterCommand),
}

#[derive(Args, Debug, Clone)]
pub struct ImportFlags {
    /// Insert everything in one all-or-nothing request.
    #[arg(long = "atomic")]
    pub atomic: bool,

    /// Skip the confirmation prompt for large imports.
    #[arg(long = "yes", short = 'y')]
    pub yes: bool,

    /// Do not fill missing fields from master student/company data.
    #[arg(long = "no-enrich")]
    pub no_enrich: bool,

    /// Rows per insert request in sequential mode.
    #[arg(long = "batch-size", value_name = "N", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Date system used by numeric date cells.
    #[arg(long = "date-system", value_enum, default_value = "1900")]
    pub date_system: DateSystemArg,
}

#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// Spreadsheet files (.xlsx, .xls, .ods, .csv) or folders containing them.
    #[arg(value_name = "PATHS", required = true)]
    pub paths: Vec<PathBuf>,

    #[command(flatten)]
    pub flags: ImportFlags,
}

#[derive(Parser, Debug)]
pub struct PasteArgs {
    /// Read the pasted table from a file instead of stdin.
    #[arg(long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub flags: ImportFlags,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Keep rows whose COLUMN matches VALUE (repeatable, all must match).
    #[arg(long = "filter", value_name = "COLUMN=VALUE")]
    pub filters: Vec<Assignment>,

    /// Keep rows where any visible column contains this text.
    #[arg(long = "search", value_name = "TEXT")]
    pub search: Option<String>,

    /// Match filter values exactly (ignoring case) instead of by substring.
    #[arg(long = "exact")]
    pub exact: bool,

    /// Show only columns filled in every row of the view.
    #[arg(long = "strict-view")]
    pub strict_view: bool,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Include the record id column.
    #[arg(long = "ids")]
    pub ids: bool,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Output file, or a folder to receive a dated file name.
    #[arg(value_name = "OUT")]
    pub out: PathBuf,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Add a column for every extra detail key found in the records.
    #[arg(long = "flatten")]
    pub flatten: bool,

    /// Add one sheet per offer type after "All Records".
    #[arg(long = "by-offer-type")]
    pub by_offer_type: bool,

    /// Leave out the S.No column.
    #[arg(long = "no-serial")]
    pub no_serial: bool,

    /// File format when OUT is a folder.
    #[arg(long = "format", value_enum, default_value = "xlsx")]
    pub format: ExportFormatArg,
}

#[derive(Subcommand, Debug)]
pub enum ColumnsCommand {
    /// Show every column with its key and visibility.
    List,

    /// Add a custom column.
    Add {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Change a column's display label.
    Rename {
        #[arg(value_name = "COLUMN")]
        column: String,
        #[arg(value_name = "LABEL")]
        label: String,
    },

    /// Hide a column from the grid and exports.
    Hide {
        #[arg(value_name = "COLUMN")]
        column: String,
    },

    /// Show a hidden column again.
    Show {
        #[arg(value_name = "COLUMN")]
        column: String,
    },

    /// Add a custom column and fill it with one pasted line per row.
    Paste {
        #[arg(value_name = "NAME")]
        name: String,

        /// Read the lines from a file instead of stdin.
        #[arg(long = "file", value_name = "PATH")]
        file: Option<PathBuf>,

        /// First view row to fill.
        #[arg(long = "from-row", value_name = "ROW", default_value = "1", value_parser = parse_row)]
        from_row: usize,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

#[derive(Parser, Debug)]
pub struct EditArgs {
    /// Set one cell of the filtered view (repeatable).
    #[arg(long = "set", value_name = "ROW:COLUMN=VALUE")]
    pub set: Vec<CellAssignment>,

    /// Copy a cell into every row up or down to TO_ROW (repeatable, applied
    /// after --set).
    #[arg(long = "fill", value_name = "ROW:COLUMN:TO_ROW")]
    pub fill: Vec<FillSpec>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Field values for the new record (repeatable).
    #[arg(long = "set", value_name = "COLUMN=VALUE")]
    pub set: Vec<Assignment>,
}

#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Id of the record to delete.
    #[arg(
        value_name = "ID",
        required_unless_present = "all_filtered",
        conflicts_with = "all_filtered"
    )]
    pub id: Option<String>,

    /// Delete every record in the filtered view.
    #[arg(long = "all-filtered")]
    pub all_filtered: bool,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Do not ask before deleting.
    #[arg(long = "yes", short = 'y')]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum MasterCommand {
    /// Import or update a master list from spreadsheet files or folders.
    Import {
        #[arg(value_enum, value_name = "LIST")]
        kind: MasterKindArg,

        /// Spreadsheet files (.xlsx, .xls, .ods, .csv) or folders containing them.
        #[arg(value_name = "PATHS", required = true)]
        paths: Vec<PathBuf>,

        /// Do not ask before writing.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// Show a master list.
    List {
        #[arg(value_enum, value_name = "LIST")]
        kind: MasterKindArg,

        /// Keep entries whose key or name contains this text.
        #[arg(long = "search", value_name = "TEXT")]
        search: Option<String>,
    },

    /// Remove entries by register number or company name.
    Delete {
        #[arg(value_enum, value_name = "LIST")]
        kind: MasterKindArg,

        #[arg(value_name = "KEY", required = true)]
        keys: Vec<String>,

        /// Do not ask before deleting.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MasterKindArg {
    Students,
    Companies,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DateSystemArg {
    #[value(name = "1900")]
    Excel1900,
    #[value(name = "1904")]
    Excel1904,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExportFormatArg {
    Xlsx,
    Csv,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
