//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sheetwright: validating record editor for CSV sheets
#[derive(Parser)]
#[command(name = "sheetwright")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a JSON configuration file
    #[arg(short, long, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the rule inferred from each header
    Rules {
        /// Path to the sheet (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check every stored row against the header rules
    Validate {
        /// Path to the sheet (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Append a new row
    Add {
        /// Path to the sheet (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Field value as HEADER=VALUE (repeatable)
        #[arg(long = "value", value_name = "HEADER=VALUE")]
        values: Vec<String>,
    },

    /// Change fields of an existing row
    Edit {
        /// Path to the sheet (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Row index (0-based, header excluded)
        #[arg(short, long)]
        row: usize,

        /// Field value as HEADER=VALUE (repeatable)
        #[arg(long = "value", value_name = "HEADER=VALUE")]
        values: Vec<String>,
    },

    /// Copy a row below itself with incremented identifiers
    Duplicate {
        /// Path to the sheet (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Row index (0-based, header excluded)
        #[arg(short, long)]
        row: usize,
    },

    /// Insert an empty row below a row
    Insert {
        /// Path to the sheet (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Row index (0-based, header excluded)
        #[arg(short, long)]
        row: usize,
    },

    /// Remove a row
    Delete {
        /// Path to the sheet (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Row index (0-based, header excluded)
        #[arg(short, long)]
        row: usize,
    },
}
