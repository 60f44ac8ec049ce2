//! HTTP request handlers.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::analysis::{AnalysisEngine, Outcome};
use crate::config::Config;
use crate::dataset::{CachedDataset, Dataset, DatasetSchema, DatasetSource};
use crate::error::{RealtyError, Result};
use crate::summarizer::create_summarizer;

/// Message for a 404 on analyze.
pub const NO_LOCATION_MESSAGE: &str = "No matching location found in dataset.";

/// Application state shared across handlers.
pub struct ApiState {
    /// Dataset accessor.
    pub source: Arc<dyn DatasetSource>,
    /// Question answering pipeline.
    pub engine: AnalysisEngine,
}

impl ApiState {
    /// Create new API state.
    pub fn new(source: Arc<dyn DatasetSource>, engine: AnalysisEngine) -> Self {
        Self { source, engine }
    }

    /// Build state from configuration: a lazily loaded dataset and the
    /// configured summarizer.
    pub fn from_config(config: &Config) -> Self {
        let source = Arc::new(CachedDataset::from_config(&config.dataset));
        let engine = AnalysisEngine::new(
            create_summarizer(&config.summarizer),
            DatasetSchema::from_config(&config.dataset),
        );
        Self::new(source, engine)
    }

    /// Fetch the dataset off the async runtime; the first call may read the file.
    pub async fn dataset(&self) -> Result<Arc<Dataset>> {
        let source = Arc::clone(&self.source);
        tokio::task::spawn_blocking(move || source.dataset())
            .await
            .map_err(|e| RealtyError::Io(std::io::Error::other(e)))?
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Analyze request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    /// Free-text question.
    #[serde(default)]
    pub message: Option<String>,
}

/// Download query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadQuery {
    /// Locality to export, matched ignoring case.
    #[serde(default)]
    pub area: Option<String>,
}

/// Locations list response.
#[derive(Debug, Clone, Serialize)]
pub struct LocationsResponse {
    pub locations: Vec<String>,
    pub total: usize,
}

/// Error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations_available: Option<Vec<String>>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            locations_available: None,
        }
    }

    fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

fn internal_error(e: RealtyError) -> Response {
    tracing::error!("Request failed: {}", e);
    ErrorResponse::new(format!("Internal Server Error: {}", e), "internal_error")
        .with_status(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Keep a header-safe file name stem.
fn attachment_name(area: &str) -> String {
    let stem: String = area
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    format!("attachment; filename=\"{}_data.csv\"", stem)
}

// ============================================================================
// Handler Functions
// ============================================================================

/// POST /api/analyze - Answer a free-text question.
pub async fn analyze_handler(
    State(state): State<Arc<ApiState>>,
    payload: std::result::Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let message = match payload {
        Ok(Json(request)) => request.message.unwrap_or_default(),
        Err(rejection) => {
            tracing::debug!("Unreadable analyze body: {}", rejection);
            String::new()
        }
    };

    if message.trim().is_empty() {
        return ErrorResponse::new("Message text is required", "invalid_request")
            .with_status(StatusCode::BAD_REQUEST);
    }

    let dataset = match state.dataset().await {
        Ok(dataset) => dataset,
        Err(e) => return internal_error(e),
    };

    match state.engine.analyze(&message, &dataset).await {
        Outcome::Answer(result) => {
            tracing::debug!(
                query_type = %result.query_type,
                locations = result.locations.len(),
                "Answered question"
            );
            (StatusCode::OK, Json(result)).into_response()
        }
        Outcome::NoLocation {
            query_type,
            available,
        } => {
            tracing::debug!(query_type = %query_type, "No location in question");
            ErrorResponse {
                locations_available: Some(available),
                ..ErrorResponse::new(NO_LOCATION_MESSAGE, "location_not_found")
            }
            .with_status(StatusCode::NOT_FOUND)
        }
    }
}

/// GET /api/download?area=... - Export one locality's rows as CSV.
pub async fn download_handler(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DownloadQuery>,
) -> Response {
    let Some(area) = query.area.filter(|a| !a.trim().is_empty()) else {
        return ErrorResponse::new("area query parameter is required", "invalid_request")
            .with_status(StatusCode::BAD_REQUEST);
    };

    let dataset = match state.dataset().await {
        Ok(dataset) => dataset,
        Err(e) => return internal_error(e),
    };

    let rows = dataset.rows_where_ignore_case(&state.engine.schema().location_column, &area);
    if rows.is_empty() {
        return ErrorResponse::new(format!("No data found for {}", area), "not_found")
            .with_status(StatusCode::NOT_FOUND);
    }

    let body = match dataset.to_csv(&rows) {
        Ok(body) => body,
        Err(e) => return internal_error(e.into()),
    };

    tracing::debug!(area = %area, rows = rows.len(), "Exported rows");

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, attachment_name(&area)),
        ],
        body,
    )
        .into_response()
}

/// GET /api/locations - List the distinct localities.
pub async fn locations_handler(State(state): State<Arc<ApiState>>) -> Response {
    match state.dataset().await {
        Ok(dataset) => {
            let locations = dataset.distinct_values(&state.engine.schema().location_column);
            Json(LocationsResponse {
                total: locations.len(),
                locations,
            })
            .into_response()
        }
        Err(e) => internal_error(e),
    }
}

/// GET /health - Liveness check.
pub async fn health_handler() -> &'static str {
    "OK"
}
