//! Read-only HTTP API over the archive.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/years` | Years present in the archive |
//! | `GET`  | `/years/{year}/months` | Months archived for a year |
//! | `GET`  | `/years/{year}/months/{month}` | Lookup keys for a year/month |
//! | `GET`  | `/{lookup_key}` | The archived file for a lookup key |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! When `[server].route_prefix` is configured, every endpoint is nested
//! under the prefix.
//!
//! # Error Contract
//!
//! Error responses are JSON:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "no archive entry for 'x'" } }
//! ```
//!
//! List endpoints always return a well-formed (possibly empty) JSON array.
//! The file endpoint returns the file bytes with a content type guessed
//! from the file name, or `not_found` when the key is unknown or the file
//! is missing from the archive directory.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser-based
//! gallery viewers can call the API cross-origin.

use axum::{
    body::Body,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::archive::ArchiveService;
use crate::config::Config;

/// Shared application state passed to all route handlers via Axum's
/// `State` extractor.
#[derive(Clone)]
struct AppState {
    /// The archive query service (wrapped in `Arc` for cheap cloning
    /// across handlers).
    service: Arc<ArchiveService>,
}

/// Starts the archive HTTP server.
///
/// Builds the index eagerly via [`ArchiveService::open`], binds to the
/// address configured in `[server].bind`, and serves until the process is
/// terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let service = Arc::new(ArchiveService::open(config)?);
    println!("Indexed {} archive entries", service.snapshot().len());

    let app = router(service, config);

    let bind_addr = &config.server.bind;
    println!("Archive server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the axum router, nesting all routes under the configured route
/// prefix when one is set.
pub fn router(service: Arc<ArchiveService>, config: &Config) -> Router {
    let state = AppState { service };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        .route("/health", get(handle_health))
        .route("/years", get(handle_years))
        .route("/years/{year}/months", get(handle_months))
        .route("/years/{year}/months/{month}", get(handle_paths))
        .route("/{*lookup_key}", get(handle_file))
        .layer(cors)
        .with_state(state);

    let prefix = config.route_prefix();
    if prefix == "/" {
        routes
    } else {
        Router::new().nest(&prefix, routes)
    }
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

/// Inner error detail with a machine-readable code and human-readable
/// message.
#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"not_found"`).
    code: String,
    /// Human-readable error message.
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 404 Not Found error.
fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

/// Constructs a 500 Internal Server Error.
fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    /// Always `"ok"` when the server is running.
    status: String,
    /// The crate version from `Cargo.toml`.
    version: String,
}

/// Handler for `GET /health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /years ============

/// Handler for `GET /years`: distinct years present in the archive,
/// ascending.
async fn handle_years(State(state): State<AppState>) -> Json<Vec<i32>> {
    Json(state.service.years())
}

// ============ GET /years/{year}/months ============

/// Handler for `GET /years/{year}/months`: distinct months archived in
/// the given year, ascending. An unknown year is an empty array, not an
/// error.
async fn handle_months(State(state): State<AppState>, Path(year): Path<i32>) -> Json<Vec<u32>> {
    Json(state.service.months(year))
}

// ============ GET /years/{year}/months/{month} ============

/// Handler for `GET /years/{year}/months/{month}`: sorted lookup keys of
/// every entry dated in that year and month.
async fn handle_paths(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Json<Vec<String>> {
    Json(state.service.paths(year, month))
}

// ============ GET /{*lookup_key} ============

/// Handler for `GET /{*lookup_key}`: the archived file for a lookup key.
///
/// The service resolves the key without touching the disk; a file missing
/// from the archive directory is reported here as `not_found`, the same
/// as an unknown key.
async fn handle_file(
    State(state): State<AppState>,
    Path(lookup_key): Path<String>,
) -> Result<Response, AppError> {
    let file_path = state
        .service
        .resolve(&lookup_key)
        .map_err(|e| not_found(e.to_string()))?;

    let contents = match tokio::fs::read(&file_path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(not_found(format!(
                "archived file for '{}' is missing",
                lookup_key
            )));
        }
        Err(e) => {
            return Err(internal(format!(
                "could not read archived file for '{}': {}",
                lookup_key, e
            )));
        }
    };

    let mime = mime_guess::from_path(&file_path).first_or_octet_stream();
    Response::builder()
        .status(StatusCode::OK)
        .header("content-type", mime.as_ref())
        .body(Body::from(contents))
        .map_err(|e| internal(e.to_string()))
}
