//! JSON summary API

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde_json::{json, Value};
use tracing::warn;

use crate::upload::{check_extension, read_upload, summarize_upload, UploadError};
use crate::{AppError, AppState};
use tally_core::SummaryReport;

fn upload_error(err: UploadError) -> AppError {
    match err {
        UploadError::TooLarge(_) => AppError::payload_too_large(&err.message()),
        _ => AppError::bad_request(&err.message()),
    }
}

/// POST /api/summary - Summarize an uploaded sheet
///
/// Upload problems are `400` (or `413` when oversized); a sheet that fails
/// validation or parsing is `422`.
pub async fn api_summary(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SummaryReport>, AppError> {
    let mut multipart = multipart.map_err(|rejection| {
        warn!(error = %rejection, "Summary request without multipart body");
        upload_error(UploadError::NoFilePart)
    })?;

    let file = read_upload(&mut multipart, state.config.max_upload_size)
        .await
        .map_err(upload_error)?;
    let format = check_extension(&file.filename, &state.config.allowed_extensions)
        .map_err(upload_error)?;

    let report = summarize_upload(&state.config, file, format)
        .await
        .map_err(|message| AppError::unprocessable(&message))?;

    Ok(Json(report))
}

/// GET /api/health - Liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
