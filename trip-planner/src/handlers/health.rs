use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

use crate::AppState;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "trip-planner",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: the completion provider must report healthy.
pub async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.planner.provider().health_check().await.map_err(|e| {
        tracing::warn!(error = %e, "Completion provider not ready");
        AppError::ServiceUnavailable
    })?;

    Ok(StatusCode::OK)
}

/// Prometheus scrape endpoint.
pub async fn metrics() -> impl IntoResponse {
    crate::services::metrics::get_metrics()
}

/// Fallback for unknown routes.
pub async fn not_found(uri: axum::http::Uri) -> AppError {
    AppError::NotFound(anyhow::anyhow!("{}", uri.path()))
}
