use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rTimeLedger
/// Period-based clock-in/clock-out ledger backed by SQLite
#[derive(Parser)]
#[command(
    name = "rtimeledger",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track main and overtime work periods per day, with live durations and statistics",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        /// Print the current configuration file to stdout
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        /// Edit the configuration file with your preferred editor
        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        /// Specify the editor to use (overrides $EDITOR/$VISUAL).
        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Clock in or out: opens a period of the given type, or closes the open one
    Clock {
        /// Period type: main (m) or overtime (ot). Defaults to the configured type.
        #[arg(long = "type", short = 't')]
        kind: Option<String>,

        /// Date (YYYY-MM-DD or YYYY/MM/DD), default today
        #[arg(long)]
        date: Option<String>,
    },

    /// Close the open period of a type
    Close {
        #[arg(long = "type", short = 't')]
        kind: Option<String>,

        #[arg(long)]
        date: Option<String>,
    },

    /// Show the periods of a day with live durations
    Status {
        #[arg(long)]
        date: Option<String>,

        /// Refresh every second until interrupted
        #[arg(long)]
        watch: bool,
    },

    /// Change fields of one period
    Edit {
        /// Date (YYYY-MM-DD or YYYY/MM/DD)
        date: String,

        /// Period number as shown by `status` / `list` (1-based)
        #[arg(long = "period", short = 'p')]
        period: usize,

        #[arg(long = "type", short = 't')]
        kind: Option<String>,

        /// New clock-in (HH:MM or HH:MM:SS)
        #[arg(long = "in")]
        clock_in: Option<String>,

        /// New clock-out (HH:MM or HH:MM:SS)
        #[arg(long = "out", conflicts_with = "clear_out")]
        clock_out: Option<String>,

        /// Remove the clock-out (period becomes in progress)
        #[arg(long = "clear-out")]
        clear_out: bool,
    },

    /// Replace all periods of a day
    Save {
        /// Date (YYYY-MM-DD or YYYY/MM/DD)
        date: String,

        /// TYPE,IN[,OUT] (repeatable), e.g. --period main,09:00,12:00
        #[arg(long = "period", short = 'p', required = true)]
        periods: Vec<String>,
    },

    /// Delete a day or a single period
    Del {
        /// Date (YYYY-MM-DD or YYYY/MM/DD)
        date: String,

        /// Period number to delete (1-based); without it the whole day is deleted
        #[arg(long = "period", short = 'p')]
        period: Option<usize>,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// List day records
    List {
        /// Filter by period.
        ///
        /// Supported formats:
        /// - YYYY, YYYY-MM, YYYY-MM-DD
        /// - ranges start:end in the same format (e.g. "2025-06-01:2025-06-10")
        /// - all
        ///
        /// If omitted, the current month is shown.
        #[arg(
            long,
            short,
            help = "Filter by year/month/day or a custom range (YYYY, YYYY-MM, YYYY-MM-DD, or ranges)"
        )]
        period: Option<String>,
    },

    /// Summary statistics and daily series
    Stats {
        /// Calendar month (YYYY-MM)
        #[arg(long, conflicts_with = "days")]
        month: Option<String>,

        /// Last N days including today (default from config)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Export day records
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file path
        #[arg(long, value_name = "FILE")]
        file: String,

        /// Date range to export (same syntax as `list --period`), default all
        #[arg(long, value_name = "RANGE")]
        range: Option<String>,

        /// Overwrite output file without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Import day records from a CSV export (existing dates are kept)
    Import {
        #[arg(long, value_name = "FILE")]
        file: String,
    },

    /// Run the one-time legacy format migration and report what it did
    Migrate,

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        /// Compress the backup into a .zip archive
        #[arg(long)]
        compress: bool,
    },
}
