//! Form action: `POST /generate-plan` (and `POST /?/generatePlan`).
//!
//! Applies the full cleanup rule set and stamps the issue date. Browsers
//! asking for `text/html` get a rendered page, everyone else gets JSON.

use askama::Template;
use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};

use crate::error::{FormFailure, PlanError};
use crate::handlers::pages::IndexTemplate;
use crate::models::{FormPlanResult, PlanSubmission};
use crate::services::{metrics, CleanupProfile};
use crate::AppState;

#[derive(Template)]
#[template(path = "plan.html")]
pub struct PlanTemplate {
    pub plan: FormPlanResult,
}

/// Form fields from either a url-encoded or a multipart body.
pub struct PlanForm(pub PlanSubmission);

#[async_trait]
impl<S> FromRequest<S> for PlanForm
where
    S: Send + Sync,
{
    type Rejection = FormFailure;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state).await.map_err(|e| {
                FormFailure(PlanError::Unexpected(anyhow::anyhow!(
                    "Invalid multipart body: {}",
                    e.body_text()
                )))
            })?;
            return read_multipart(multipart).await.map(PlanForm);
        }

        let Form(fields) = Form::<Vec<(String, String)>>::from_request(req, state)
            .await
            .map_err(|e| {
                FormFailure(PlanError::Unexpected(anyhow::anyhow!(
                    "Invalid form body: {}",
                    e.body_text()
                )))
            })?;

        Ok(PlanForm(PlanSubmission::from_fields(fields)))
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<PlanSubmission, FormFailure> {
    let mut submission = PlanSubmission::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        FormFailure(PlanError::Unexpected(anyhow::anyhow!(
            "Failed to read multipart field: {}",
            e
        )))
    })? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        // First value of a repeated field wins
        let Some(slot) = submission.field_mut(&name).filter(|slot| slot.is_none()) else {
            continue;
        };

        let value = field.text().await.map_err(|e| {
            FormFailure(PlanError::Unexpected(anyhow::anyhow!(
                "Failed to read multipart field '{}': {}",
                name,
                e
            )))
        })?;
        *slot = Some(value);
    }

    Ok(submission)
}

fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

pub async fn generate_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<PlanForm, FormFailure>,
) -> Response {
    let outcome = match form {
        Ok(PlanForm(submission)) => state
            .planner
            .generate(submission, CleanupProfile::Full)
            .await
            .map(FormPlanResult::from)
            .map_err(FormFailure),
        Err(failure) => Err(failure),
    };

    metrics::record_plan_request(
        "form",
        match &outcome {
            Ok(_) => "success",
            Err(FormFailure(err)) => err.kind(),
        },
    );

    match (outcome, wants_html(&headers)) {
        (Ok(plan), true) => PlanTemplate { plan }.into_response(),
        (Ok(plan), false) => (StatusCode::OK, Json(plan)).into_response(),
        (Err(FormFailure(err)), true) => {
            err.log();
            let (status, message) = err.form_status_and_message();
            (
                status,
                IndexTemplate {
                    error: Some(message.to_string()),
                },
            )
                .into_response()
        }
        (Err(failure), false) => failure.into_response(),
    }
}
