//! HTTP router and server.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::{
    analyze_handler, download_handler, health_handler, locations_handler, ApiState,
};
use crate::config::ServerConfig;

/// Create the HTTP router.
///
/// Endpoints (prefix from configuration, default `/api`):
/// - POST /api/analyze            - Answer a question
/// - GET  /api/download?area=...  - CSV export of one locality
/// - GET  /api/locations          - Distinct localities
/// - GET  /health                 - Liveness check
///
/// The analyze and download routes also accept a trailing slash.
pub fn create_router(state: Arc<ApiState>, config: &ServerConfig) -> Router {
    let api_routes = Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/analyze/", post(analyze_handler))
        .route("/download", get(download_handler))
        .route("/download/", get(download_handler))
        .route("/locations", get(locations_handler))
        .with_state(state);

    // `Config::validate` guarantees a leading '/' on non-empty prefixes.
    let prefix = config.prefix.trim_end_matches('/');
    let router = if prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(prefix, api_routes)
    };

    let router = router
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http());

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .allow_origin(Any);

        router.layer(cors)
    } else {
        router
    }
}

/// Serve the API until the process is stopped.
pub async fn run_http(state: Arc<ApiState>, config: &ServerConfig) -> Result<()> {
    let app = create_router(state, config);

    let addr = format!("{}:{}", config.host, config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        "Realty API listening on http://{}{}",
        listener.local_addr()?,
        config.prefix
    );

    axum::serve(listener, app).await?;

    info!("Realty API shutting down");
    Ok(())
}
