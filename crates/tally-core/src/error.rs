//! Error types for Tally

use thiserror::Error;

/// Message shown when the required columns are missing
pub const SCHEMA_MESSAGE: &str =
    r#"Error: The uploaded file must contain "date", "income", and "expenses" columns."#;

#[derive(Error, Debug)]
pub enum Error {
    #[error("missing required columns: date, income, expenses")]
    Schema,

    #[error("{0}")]
    Parse(String),

    #[error("no monthly data found in the file")]
    EmptyResult,

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification exposed to callers.
///
/// The web and CLI front ends only distinguish a bad column layout from
/// everything else that went wrong while processing the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Schema,
    Processing,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Schema => ErrorKind::Schema,
            _ => ErrorKind::Processing,
        }
    }

    /// Render the single human-readable message handed back to the user
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Schema => SCHEMA_MESSAGE.to_string(),
            ErrorKind::Processing => processing_message(self),
        }
    }
}

/// Generic processing-error message for any displayable failure
pub fn processing_message(detail: impl std::fmt::Display) -> String {
    format!("An error occurred processing the file: {}", detail)
}

pub type Result<T> = std::result::Result<T, Error>;
