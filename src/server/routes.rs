//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::distance::DistanceUnit;
use crate::error::Error;
use crate::format::{available_formats, FormatInfo};
use crate::geo::{GeoBackend, RegionHint};
use crate::search::report::SearchReport;
use crate::search::{messages, parse_pair};
use crate::server::state::AppState;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Directory of static files served next to the API, if one exists
fn static_dir() -> Option<PathBuf> {
    let cwd = PathBuf::from("static");
    if cwd.is_dir() {
        return Some(cwd);
    }
    let exe = std::env::current_exe().ok()?;
    let beside_exe = exe.parent()?.join("static");
    beside_exe.is_dir().then_some(beside_exe)
}

/// Create the API router
pub fn create_router<G: GeoBackend + 'static>(state: Arc<AppState<G>>) -> Router {
    let router = Router::new()
        .route("/api/distance", get(distance_get::<G>).post(distance_post::<G>))
        .route("/api/status", get(status_handler::<G>))
        .route("/api/formats", get(formats_handler));

    let router = match static_dir() {
        Some(dir) => router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true)),
        None => router,
    };

    router.with_state(state)
}

/// Distance request, as query string or JSON body
#[derive(Debug, Default, Deserialize)]
pub struct DistanceRequest {
    /// First place
    #[serde(default)]
    pub from: String,
    /// Second place
    #[serde(default)]
    pub to: String,
    /// Distance unit; the configured default when absent
    pub unit: Option<String>,
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let (code, error) = match &err {
            Error::InvalidInput(_) => ("INVALID_INPUT", messages::EMPTY_INPUT.to_string()),
            Error::Config(_) => ("CONFIG_ERROR", err.to_string()),
            _ => ("INTERNAL_ERROR", err.to_string()),
        };
        ApiError {
            error,
            code: code.to_string(),
        }
    }
}

/// Look up both places and build the report
///
/// Every outcome, `Failure` included, is a successful response; only bad
/// input is an error.
async fn run_search<G: GeoBackend>(
    state: &AppState<G>,
    req: DistanceRequest,
) -> Result<Json<SearchReport>, ApiError> {
    let unit_name = req.unit.as_deref().unwrap_or(&state.config.defaults.unit);
    let unit = DistanceUnit::from_str(unit_name).map_err(|e| ApiError {
        error: e,
        code: "INVALID_UNIT".to_string(),
    })?;

    let (from, to) = parse_pair(&req.from, &req.to)?;
    let outcome = state.orchestrator.search_queries(&from, &to).await;

    Ok(Json(SearchReport::standalone(from, to, unit, outcome)))
}

/// Distance between two places
///
/// GET /api/distance?from=..&to=..&unit=..
async fn distance_get<G: GeoBackend>(
    State(state): State<Arc<AppState<G>>>,
    Query(req): Query<DistanceRequest>,
) -> Result<Json<SearchReport>, ApiError> {
    run_search(&state, req).await
}

/// Distance between two places
///
/// POST /api/distance
async fn distance_post<G: GeoBackend>(
    State(state): State<Arc<AppState<G>>>,
    Json(req): Json<DistanceRequest>,
) -> Result<Json<SearchReport>, ApiError> {
    run_search(&state, req).await
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Geocoding service base URL
    pub geocoder: String,
    /// Region tried first, if any
    pub region: Option<RegionHint>,
    /// Whether a real contact address is configured
    pub contact_configured: bool,
    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler<G: GeoBackend>(
    State(state): State<Arc<AppState<G>>>,
) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        geocoder: state.config.geocoder.base_url.clone(),
        region: state.orchestrator.region().cloned(),
        contact_configured: !state.config.geocoder.contact_is_placeholder(),
        uptime_secs: state.uptime_secs(),
    })
}

/// Formats list response
#[derive(Debug, Serialize, Deserialize)]
pub struct FormatsResponse {
    pub formats: Vec<FormatInfo>,
}

/// List available output formats
///
/// GET /api/formats
async fn formats_handler() -> Json<FormatsResponse> {
    Json(FormatsResponse {
        formats: available_formats(),
    })
}
