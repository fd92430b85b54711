//! Upload form and results page

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::templates;
use crate::upload::{check_extension, read_upload, summarize_upload, UploadError};
use crate::{AppError, AppState};

/// Query parameters for the form page
#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    /// Message flashed by a failed upload
    pub error: Option<String>,
}

/// Redirect back to the form with a one-shot message
fn flash_redirect(message: &str) -> Response {
    Redirect::to(&format!("/?error={}", urlencoding::encode(message))).into_response()
}

/// GET / - Upload form
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IndexQuery>,
) -> Result<Html<String>, AppError> {
    let context = templates::index_context(params.error.as_deref());
    let html = state.templates.render("index.html", &context)?;
    Ok(Html(html))
}

/// POST / - Summarize an uploaded workbook and render the results page
///
/// Every rejection redirects back to the form with the message flashed.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => {
            warn!(error = %rejection, "Form post without multipart body");
            return Ok(flash_redirect(&UploadError::NoFilePart.message()));
        }
    };

    let file = match read_upload(&mut multipart, state.config.max_upload_size).await {
        Ok(file) => file,
        Err(e) => {
            warn!(error = ?e, "Upload rejected");
            return Ok(flash_redirect(&e.message()));
        }
    };

    let format = match check_extension(&file.filename, &state.config.allowed_extensions) {
        Ok(format) => format,
        Err(e) => {
            info!(filename = %file.filename, "Upload has a disallowed extension");
            return Ok(flash_redirect(&e.message()));
        }
    };

    let report = match summarize_upload(&state.config, file, format).await {
        Ok(report) => report,
        Err(message) => return Ok(flash_redirect(&message)),
    };

    let context = templates::results_context(&report)?;
    let html = state.templates.render("results.html", &context)?;
    Ok(Html(html).into_response())
}
