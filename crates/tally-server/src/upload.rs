//! Upload handling shared by the form and API endpoints

use std::io::Write;
use std::path::{Path, PathBuf};

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use tempfile::NamedTempFile;
use tracing::{debug, error, info};

use tally_core::error::processing_message;
use tally_core::{SheetFormat, SummaryReport};

use crate::ServerConfig;

/// A file pulled out of a multipart form
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Reasons an upload is rejected before it reaches the summary pipeline
#[derive(Debug, PartialEq, Eq)]
pub enum UploadError {
    NoFilePart,
    NoSelectedFile,
    InvalidFormat(String),
    TooLarge(usize),
    Malformed(String),
}

impl UploadError {
    pub fn message(&self) -> String {
        match self {
            Self::NoFilePart => "No file part".to_string(),
            Self::NoSelectedFile => "No selected file".to_string(),
            Self::InvalidFormat(expected) => {
                format!("Invalid file format. Please upload {}.", expected)
            }
            Self::TooLarge(max) => format!(
                "File too large. Maximum size is {} MB",
                max / 1024 / 1024
            ),
            Self::Malformed(detail) => format!("Failed to read upload: {}", detail),
        }
    }
}

/// Read the `file` field from a multipart form
pub async fn read_upload(
    multipart: &mut Multipart,
    max_size: usize,
) -> Result<UploadedFile, UploadError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_size))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_size))?;

        if bytes.len() > max_size {
            return Err(UploadError::TooLarge(max_size));
        }
        if filename.is_empty() {
            return Err(UploadError::NoSelectedFile);
        }

        return Ok(UploadedFile {
            filename,
            bytes: bytes.to_vec(),
        });
    }

    Err(UploadError::NoFilePart)
}

fn multipart_error(err: MultipartError, max_size: usize) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge(max_size)
    } else {
        UploadError::Malformed(err.body_text())
    }
}

/// Check the file extension against the allow-list
pub fn check_extension(filename: &str, allowed: &[String]) -> Result<SheetFormat, UploadError> {
    let invalid = || UploadError::InvalidFormat(describe_extensions(allowed));

    let (_, ext) = filename.rsplit_once('.').ok_or_else(invalid)?;
    let ext = ext.to_lowercase();
    if !allowed.iter().any(|a| *a == ext) {
        return Err(invalid());
    }
    ext.parse::<SheetFormat>().map_err(|_| invalid())
}

fn describe_extensions(allowed: &[String]) -> String {
    match allowed {
        [single] => format!("an .{} file", single),
        _ => {
            let list: Vec<String> = allowed.iter().map(|e| format!(".{}", e)).collect();
            format!("one of: {}", list.join(", "))
        }
    }
}

/// Reduce a client-supplied filename to a safe, flat ASCII name.
///
/// Path separators become spaces, anything outside `[A-Za-z0-9_.-]` is
/// dropped, whitespace runs collapse to `_`, and leading/trailing `.`/`_`
/// are stripped. May return an empty string.
pub fn secure_filename(filename: &str) -> String {
    let flattened: String = filename
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .filter(|c| c.is_ascii())
        .collect();

    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Write the upload into the upload directory; the file is removed when dropped
fn stage_upload(dir: &Path, filename: &str, bytes: &[u8]) -> std::io::Result<NamedTempFile> {
    let safe = secure_filename(filename);
    let prefix = if safe.is_empty() {
        "upload-".to_string()
    } else {
        format!("{}-", safe)
    };

    let mut staged = tempfile::Builder::new()
        .prefix(&prefix)
        .tempfile_in(dir)?;
    staged.write_all(bytes)?;
    staged.flush()?;
    debug!(path = %staged.path().display(), size = bytes.len(), "Staged upload");
    Ok(staged)
}

/// Stage the upload and run the summary pipeline on a blocking worker.
///
/// The staged copy is read back and handed to the pipeline as bytes; it is
/// removed before the worker returns.
pub async fn summarize_upload(
    config: &ServerConfig,
    file: UploadedFile,
    format: SheetFormat,
) -> Result<SummaryReport, String> {
    let upload_dir: PathBuf = config.upload_dir.clone();
    let UploadedFile { filename, bytes } = file;

    info!(filename = %secure_filename(&filename), size = bytes.len(), format = %format, "Summarizing upload");

    run_blocking(move || {
        let staged = stage_upload(&upload_dir, &filename, &bytes)?;
        drop(bytes);
        let contents = std::fs::read(staged.path())?;
        tally_core::summarize_bytes(&contents, format)
    })
    .await
}

/// Run a pipeline job on the blocking pool.
///
/// Every failure, including a panic inside the job, comes back as the single
/// user-facing message.
async fn run_blocking<F>(job: F) -> Result<SummaryReport, String>
where
    F: FnOnce() -> tally_core::Result<SummaryReport> + Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(Ok(report)) => Ok(report),
        Ok(Err(e)) => {
            info!(kind = ?e.kind(), error = %e, "Summary failed");
            Err(e.user_message())
        }
        Err(join_err) => {
            error!(error = %join_err, "Summary worker failed");
            Err(processing_message("internal error"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed(exts: &[&str]) -> Vec<String> {
        exts.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("My cool movie.mov"), "My_cool_movie.mov");
        assert_eq!(secure_filename("../../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("i contain cool \u{fc}ml\u{e4}uts.txt"), "i_contain_cool_mluts.txt");
        assert_eq!(secure_filename("..."), "");
        assert_eq!(secure_filename("budget 2024.xlsx"), "budget_2024.xlsx");
    }

    #[test]
    fn test_check_extension() {
        let xlsx_only = allowed(&["xlsx"]);
        assert_eq!(check_extension("budget.xlsx", &xlsx_only), Ok(SheetFormat::Xlsx));
        assert_eq!(check_extension("BUDGET.XLSX", &xlsx_only), Ok(SheetFormat::Xlsx));
        assert_eq!(
            check_extension("budget.csv", &xlsx_only),
            Err(UploadError::InvalidFormat("an .xlsx file".into()))
        );
        assert!(check_extension("budget", &xlsx_only).is_err());
    }

    #[test]
    fn test_check_extension_multiple_allowed() {
        let both = allowed(&["xlsx", "csv"]);
        assert_eq!(check_extension("export.csv", &both), Ok(SheetFormat::Csv));
        assert_eq!(
            check_extension("export.xls", &both).unwrap_err().message(),
            "Invalid file format. Please upload one of: .xlsx, .csv."
        );
    }

    #[test]
    fn test_upload_error_messages() {
        assert_eq!(UploadError::NoFilePart.message(), "No file part");
        assert_eq!(UploadError::NoSelectedFile.message(), "No selected file");
        assert_eq!(
            UploadError::InvalidFormat("an .xlsx file".into()).message(),
            "Invalid file format. Please upload an .xlsx file."
        );
        assert_eq!(
            UploadError::TooLarge(10 * 1024 * 1024).message(),
            "File too large. Maximum size is 10 MB"
        );
    }

    #[tokio::test]
    async fn test_run_blocking_reports_pipeline_error() {
        let message = run_blocking(|| Err(tally_core::Error::Schema)).await.unwrap_err();
        assert_eq!(message, tally_core::error::SCHEMA_MESSAGE);
    }

    #[tokio::test]
    async fn test_run_blocking_contains_worker_panic() {
        let message = run_blocking(|| panic!("worker blew up")).await.unwrap_err();
        assert_eq!(
            message,
            "An error occurred processing the file: internal error"
        );
    }

    #[test]
    fn test_staged_upload_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let staged = stage_upload(dir.path(), "../budget.xlsx", b"data").unwrap();
        let path = staged.path().to_path_buf();

        assert!(path.starts_with(dir.path()));
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("budget.xlsx-"));
        assert_eq!(std::fs::read(&path).unwrap(), b"data");

        drop(staged);
        assert!(!path.exists());
    }
}
