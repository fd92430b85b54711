//! CLI command tests

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use tally_core::SheetFormat;
use tempfile::NamedTempFile;

use crate::cli::{Cli, Commands};
use crate::commands;

const BUDGET_CSV: &str = "date,income,expenses\n\
                          2024-01-10,100,50\n\
                          2024-01-20,200,70\n\
                          2024-02-05,50,80\n";

/// Write a temporary sheet with the given extension
fn sheet_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

// ========== Format Resolution Tests ==========

#[test]
fn test_resolve_format_from_extension() {
    let format = commands::resolve_format(Path::new("budget.xlsx"), None).unwrap();
    assert_eq!(format, SheetFormat::Xlsx);

    let format = commands::resolve_format(Path::new("dir/export.CSV"), None).unwrap();
    assert_eq!(format, SheetFormat::Csv);
}

#[test]
fn test_resolve_format_override() {
    let format = commands::resolve_format(Path::new("export.txt"), Some("csv")).unwrap();
    assert_eq!(format, SheetFormat::Csv);

    assert!(commands::resolve_format(Path::new("export.csv"), Some("ods")).is_err());
}

#[test]
fn test_resolve_format_unknown_extension() {
    let err = commands::resolve_format(Path::new("notes.txt"), None).unwrap_err();
    assert!(err.to_string().contains("--format"));
}

// ========== Summarize Command Tests ==========

#[test]
fn test_cmd_summarize_csv() {
    let file = sheet_file(".csv", BUDGET_CSV);
    assert!(commands::cmd_summarize(file.path(), None, false).is_ok());
    assert!(commands::cmd_summarize(file.path(), None, true).is_ok());
}

#[test]
fn test_cmd_summarize_missing_columns() {
    let file = sheet_file(".csv", "date,income\n2024-01-10,100\n");
    let err = commands::cmd_summarize(file.path(), None, false).unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        tally_core::error::SCHEMA_MESSAGE
    );
}

#[test]
fn test_cmd_summarize_missing_file() {
    let result = commands::cmd_summarize(Path::new("/nonexistent/budget.csv"), None, false);
    assert!(result.is_err());
}

#[test]
fn test_summary_table_rendering() {
    let report = tally_core::summarize_bytes(BUDGET_CSV.as_bytes(), SheetFormat::Csv).unwrap();
    let text = commands::SummaryTable(&report).to_string();

    assert!(text.contains("(2 months)"));
    assert!(text.contains("$300.00  January 2024"));
    assert!(text.contains("$175.00"));

    // Rows follow first-seen month order
    let jan = text.rfind("January 2024").unwrap();
    let feb = text.rfind("February 2024").unwrap();
    assert!(jan < feb);
}

// ========== Serve Config Tests ==========

#[test]
fn test_build_config() {
    let config = commands::build_config(PathBuf::from("/tmp/tally"), 5, "xlsx, .csv").unwrap();
    assert_eq!(config.upload_dir, PathBuf::from("/tmp/tally"));
    assert_eq!(config.max_upload_size, 5 * 1024 * 1024);
    assert_eq!(config.allowed_extensions, ["xlsx", "csv"]);
}

#[test]
fn test_build_config_rejects_bad_settings() {
    assert!(commands::build_config(PathBuf::from("uploads"), 0, "xlsx").is_err());
    assert!(commands::build_config(PathBuf::from("uploads"), usize::MAX, "xlsx").is_err());
    assert!(commands::build_config(PathBuf::from("uploads"), 10, " , ").is_err());
    assert!(commands::build_config(PathBuf::from("uploads"), 10, "xlsx,pdf").is_err());
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_summarize_args() {
    let cli = Cli::try_parse_from(["tally", "summarize", "--file", "budget.xlsx", "--json"]).unwrap();
    match cli.command {
        Commands::Summarize { file, format, json } => {
            assert_eq!(file, PathBuf::from("budget.xlsx"));
            assert_eq!(format, None);
            assert!(json);
        }
        _ => panic!("expected summarize"),
    }
}

#[test]
fn test_parse_serve_args() {
    let cli = Cli::try_parse_from([
        "tally",
        "-v",
        "serve",
        "--port",
        "8080",
        "--upload-dir",
        "/srv/uploads",
        "--max-upload-mb",
        "2",
        "--extensions",
        "xlsx,csv",
    ])
    .unwrap();

    assert!(cli.verbose);
    match cli.command {
        Commands::Serve {
            port,
            host,
            upload_dir,
            max_upload_mb,
            extensions,
        } => {
            assert_eq!(port, 8080);
            assert_eq!(host, "127.0.0.1");
            assert_eq!(upload_dir, PathBuf::from("/srv/uploads"));
            assert_eq!(max_upload_mb, 2);
            assert_eq!(extensions, "xlsx,csv");
        }
        _ => panic!("expected serve"),
    }
}

#[test]
fn test_summarize_requires_file() {
    assert!(Cli::try_parse_from(["tally", "summarize"]).is_err());
}
