//! Plan generation pipeline shared by the form action and the JSON API.
//!
//! validate, build prompt, call the provider, clean the text. The two entry
//! points differ only in the [`CleanupProfile`] they pass and in how they
//! shape the result.

use chrono::Utc;
use service_core::retry::{retry_with_backoff, RetryConfig};
use std::sync::Arc;
use std::time::Instant;

use crate::config::ModelConfig;
use crate::error::PlanError;
use crate::models::{GeneratedPlan, PlanRequest, PlanSubmission};
use crate::services::cleanup::{self, CleanupProfile};
use crate::services::metrics;
use crate::services::providers::{
    ChatMessage, CompletionProvider, CompletionRequest, ProviderError,
};

pub const SYSTEM_PROMPT: &str = "You are a travel planning expert who creates detailed, \
personalized travel itineraries. Return your response as clean HTML without markdown code \
block syntax.";

/// Interests used in the prompt when the traveller gave none.
pub const DEFAULT_INTERESTS: &str = "general sightseeing";

/// Render the user prompt for a validated request.
pub fn build_prompt(request: &PlanRequest) -> String {
    let interests = request
        .interests
        .as_deref()
        .filter(|i| !i.is_empty())
        .unwrap_or(DEFAULT_INTERESTS);

    format!(
        "Create a detailed {duration}-day travel itinerary for {destination}.\n\
         Budget level: {budget}.\n\
         Travel style: {style}.\n\
         Interests: {interests}.\n\
         \n\
         Include:\n\
         - Day-by-day breakdown with morning, afternoon, and evening activities\n\
         - Recommended places to eat\n\
         - Notable attractions to visit\n\
         - Practical tips specific to this destination\n\
         \n\
         Format the response as HTML with proper headings, lists, and paragraphs. \
         Do not include markdown code block markers like ```html or ```.",
        duration = request.duration,
        destination = request.destination,
        budget = request.budget,
        style = request.travel_style,
        interests = interests,
    )
}

/// Turns trip preferences into cleaned itinerary HTML.
///
/// Holds the process-wide provider handle; cheap to share behind an `Arc`.
pub struct PlanService {
    provider: Arc<dyn CompletionProvider>,
    model: String,
    temperature: f32,
    retry: RetryConfig,
}

impl PlanService {
    pub fn new(provider: Arc<dyn CompletionProvider>, models: &ModelConfig, retry: RetryConfig) -> Self {
        Self {
            provider,
            model: models.text_model.clone(),
            temperature: models.temperature,
            retry,
        }
    }

    pub fn provider(&self) -> &Arc<dyn CompletionProvider> {
        &self.provider
    }

    /// The exact completion request sent for `request`.
    pub fn completion_request(&self, request: &PlanRequest) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(build_prompt(request)),
            ],
            temperature: self.temperature,
        }
    }

    /// Run the whole pipeline for one submission.
    pub async fn generate(
        &self,
        submission: PlanSubmission,
        profile: CleanupProfile,
    ) -> Result<GeneratedPlan, PlanError> {
        let request = submission.validate()?;
        let completion_request = self.completion_request(&request);

        let provider = self.provider.name();
        let start = Instant::now();
        let result = retry_with_backoff(
            &self.retry,
            "chat_completion",
            ProviderError::is_transient,
            || self.provider.complete(&completion_request),
        )
        .await;
        metrics::record_provider_latency(provider, &self.model, start.elapsed().as_secs_f64());

        let response = result.map_err(|err| {
            metrics::record_provider_error(provider, err.kind());
            err
        })?;

        metrics::record_tokens(&self.model, response.input_tokens, response.output_tokens);

        let raw = response.text.unwrap_or_default();
        let plan_html = cleanup::clean(&raw, profile);

        tracing::info!(
            destination = %request.destination,
            duration = request.duration,
            model = %self.model,
            cleanup = profile.as_str(),
            finish_reason = response.finish_reason.as_str(),
            raw_len = raw.len(),
            html_len = plan_html.len(),
            "Generated travel plan"
        );

        Ok(GeneratedPlan {
            request,
            plan_html,
            issued_on: Utc::now().date_naive(),
        })
    }
}
