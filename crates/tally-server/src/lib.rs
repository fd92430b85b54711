//! Tally Web Server
//!
//! Axum-based front end for the Tally monthly summarizer.
//!
//! - Upload form and rendered results page (`GET /`, `POST /`)
//! - JSON summary API (`POST /api/summary`)
//! - Upload size limits and extension allow-list
//! - Uploads staged in the configured upload directory for one request only
//! - Sanitized error responses

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tera::Tera;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info};

mod handlers;
mod templates;
mod upload;

pub use upload::secure_filename;

/// Default maximum file upload size (10 MB)
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Room for multipart framing on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Writable directory where uploads are staged while a request runs
    pub upload_dir: PathBuf,
    /// Largest accepted upload in bytes
    pub max_upload_size: usize,
    /// Accepted file extensions, lowercase without the dot
    pub allowed_extensions: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            allowed_extensions: vec!["xlsx".to_string()],
        }
    }
}

/// Parse a comma-separated extension list (e.g. "xlsx, .csv")
pub fn parse_extensions(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Shared application state
pub struct AppState {
    pub config: ServerConfig,
    pub templates: Tera,
}

pub fn create_router(config: ServerConfig) -> anyhow::Result<Router> {
    let templates = templates::load()?;
    let body_limit = config.max_upload_size.saturating_add(MULTIPART_OVERHEAD);

    let state = Arc::new(AppState { config, templates });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/summary", post(handlers::api_summary));

    // Chart.js is loaded from jsDelivr and fed by an inline data block
    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net; style-src 'self' 'unsafe-inline'; img-src 'self' data:; frame-ancestors 'none'"
    );

    let app = Router::new()
        .route("/", get(handlers::index).post(handlers::upload_file))
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    Ok(app)
}

/// Start the server
pub async fn serve(host: &str, port: u16) -> anyhow::Result<()> {
    serve_with_config(host, port, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(host: &str, port: u16, config: ServerConfig) -> anyhow::Result<()> {
    std::fs::create_dir_all(&config.upload_dir)?;
    info!(
        upload_dir = %config.upload_dir.display(),
        max_upload_mb = config.max_upload_size / 1024 / 1024,
        extensions = ?config.allowed_extensions,
        "Upload storage ready"
    );

    let app = create_router(config)?;
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn payload_too_large(msg: &str) -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unprocessable(msg: &str) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
