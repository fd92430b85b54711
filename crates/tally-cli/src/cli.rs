//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Monthly income and expense summaries from a spreadsheet
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Summarize a spreadsheet of income and expenses by month", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize a sheet with date, income and expenses columns
    Summarize {
        /// Sheet to read (.xlsx or .csv)
        #[arg(short, long)]
        file: PathBuf,

        /// Input format (detected from the extension if not specified)
        #[arg(long)]
        format: Option<String>,

        /// Print the summary as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory where uploads are staged while a request runs
        #[arg(long, env = "TALLY_UPLOAD_DIR", default_value = "uploads")]
        upload_dir: PathBuf,

        /// Largest accepted upload in megabytes
        #[arg(long, env = "TALLY_MAX_UPLOAD_MB", default_value = "10")]
        max_upload_mb: usize,

        /// Accepted upload extensions, comma-separated
        #[arg(long, env = "TALLY_ALLOWED_EXTENSIONS", default_value = "xlsx")]
        extensions: String,
    },
}
