//! Failure taxonomy for plan generation and its two HTTP renderings.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::providers::ProviderError;

pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";
pub const FORM_UPSTREAM_MESSAGE: &str = "Error communicating with AI service. Please try again.";
pub const FORM_UNEXPECTED_MESSAGE: &str = "Failed to generate travel plan. Please try again.";
pub const API_FAILURE_MESSAGE: &str = "Failed to generate travel plan";

#[derive(Debug, Error)]
pub enum PlanError {
    /// A required field is missing or unparseable. No provider call is made.
    #[error("Invalid plan request: {0}")]
    Validation(String),

    #[error("Completion provider error: {0}")]
    Upstream(#[from] ProviderError),

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl PlanError {
    /// Label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PlanError::Validation(_) => "validation",
            PlanError::Upstream(_) => "upstream",
            PlanError::Unexpected(_) => "unexpected",
        }
    }

    /// Record the full cause; callers only ever see the generic message.
    pub fn log(&self) {
        match self {
            PlanError::Validation(reason) => tracing::info!(%reason, "Rejected plan request"),
            PlanError::Upstream(err) => {
                tracing::error!(error = %err, "Completion provider call failed")
            }
            PlanError::Unexpected(err) => {
                tracing::error!(error = ?err, "Error generating travel plan")
            }
        }
    }

    /// Status and caller-facing message for the form action.
    pub fn form_status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            PlanError::Validation(_) => (StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE),
            PlanError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, FORM_UPSTREAM_MESSAGE),
            PlanError::Unexpected(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, FORM_UNEXPECTED_MESSAGE)
            }
        }
    }

    /// Status and caller-facing message for the JSON API.
    pub fn api_status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            PlanError::Validation(_) => (StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE),
            PlanError::Upstream(_) | PlanError::Unexpected(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, API_FAILURE_MESSAGE)
            }
        }
    }
}

/// Form action failure rendered as `{ "error": ... }`.
#[derive(Debug)]
pub struct FormFailure(pub PlanError);

/// JSON API failure rendered as `{ "error": ... }`.
#[derive(Debug)]
pub struct ApiFailure(pub PlanError);

impl IntoResponse for FormFailure {
    fn into_response(self) -> Response {
        self.0.log();
        let (status, message) = self.0.form_status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        self.0.log();
        let (status, message) = self.0.api_status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<PlanError> for FormFailure {
    fn from(err: PlanError) -> Self {
        FormFailure(err)
    }
}

impl From<PlanError> for ApiFailure {
    fn from(err: PlanError) -> Self {
        ApiFailure(err)
    }
}
