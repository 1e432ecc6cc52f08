use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::error::{ApiFailure, PlanError};
use crate::models::{ApiPlanBody, ApiPlanResult};
use crate::services::{metrics, CleanupProfile};
use crate::AppState;

/// `POST /api/generate-plan`: JSON in, JSON out, fences stripped only.
pub async fn generate_plan(
    State(state): State<AppState>,
    body: Result<Json<ApiPlanBody>, JsonRejection>,
) -> Result<Json<ApiPlanResult>, ApiFailure> {
    let result = match body {
        Ok(Json(body)) => state
            .planner
            .generate(body.into_submission(), CleanupProfile::FenceOnly)
            .await
            .map(ApiPlanResult::from),
        Err(rejection) => Err(PlanError::Unexpected(anyhow::anyhow!(
            "Invalid JSON body: {}",
            rejection.body_text()
        ))),
    };

    metrics::record_plan_request(
        "api",
        match &result {
            Ok(_) => "success",
            Err(err) => err.kind(),
        },
    );

    Ok(Json(result?))
}
