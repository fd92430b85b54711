//! Tally CLI - Monthly income/expense summarizer
//!
//! Usage:
//!   tally summarize --file budget.xlsx   Print the monthly summary
//!   tally summarize --file x.csv --json  Print the summary as JSON
//!   tally serve --port 3000              Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Summarize { file, format, json } => {
            commands::cmd_summarize(&file, format.as_deref(), json)
        }
        Commands::Serve {
            port,
            host,
            upload_dir,
            max_upload_mb,
            extensions,
        } => commands::cmd_serve(&host, port, upload_dir, max_upload_mb, &extensions).await,
    }
}
