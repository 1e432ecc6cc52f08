use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Raw trip preferences as submitted, before validation.
///
/// Form posts deliver every field as text; the JSON body is normalized into
/// this shape by [`ApiPlanBody::into_submission`].
#[derive(Debug, Clone, Default)]
pub struct PlanSubmission {
    pub destination: Option<String>,
    pub duration: Option<String>,
    pub budget: Option<String>,
    pub interests: Option<String>,
    pub travel_style: Option<String>,
}

/// Validated trip preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    pub destination: String,
    /// Trip length in days, always at least one.
    pub duration: u32,
    pub budget: String,
    pub interests: Option<String>,
    pub travel_style: String,
}

/// JSON body accepted by `POST /api/generate-plan`.
///
/// `duration` may arrive as a number or a numeric string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPlanBody {
    pub destination: Option<String>,
    pub duration: Option<serde_json::Value>,
    pub budget: Option<String>,
    pub interests: Option<String>,
    pub travel_style: Option<String>,
}

impl ApiPlanBody {
    pub fn into_submission(self) -> PlanSubmission {
        let duration = self.duration.and_then(|value| match value {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        PlanSubmission {
            destination: self.destination,
            duration,
            budget: self.budget,
            interests: self.interests,
            travel_style: self.travel_style,
        }
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, PlanError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(PlanError::Validation(format!("{} is required", field))),
    }
}

impl PlanSubmission {
    /// Build a submission from form fields. When a name repeats, the first
    /// value wins; unknown names are ignored.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut submission = Self::default();
        for (name, value) in fields {
            if let Some(slot) = submission.field_mut(name.as_ref()) {
                if slot.is_none() {
                    *slot = Some(value.into());
                }
            }
        }
        submission
    }

    /// Slot for the form field called `name`, if it is one we read.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
        match name {
            "destination" => Some(&mut self.destination),
            "duration" => Some(&mut self.duration),
            "budget" => Some(&mut self.budget),
            "interests" => Some(&mut self.interests),
            "travelStyle" => Some(&mut self.travel_style),
            _ => None,
        }
    }

    /// Check presence of the required fields and parse the duration.
    ///
    /// Values are kept exactly as submitted so they can be echoed back.
    pub fn validate(self) -> Result<PlanRequest, PlanError> {
        let destination = required("destination", self.destination)?;
        let raw_duration = required("duration", self.duration)?;
        let budget = required("budget", self.budget)?;
        let travel_style = required("travelStyle", self.travel_style)?;

        let duration = match raw_duration.trim().parse::<u32>() {
            Ok(days) if days > 0 => days,
            _ => {
                return Err(PlanError::Validation(format!(
                    "duration must be a positive whole number of days, got '{}'",
                    raw_duration
                )))
            }
        };

        Ok(PlanRequest {
            destination,
            duration,
            budget,
            interests: self.interests,
            travel_style,
        })
    }
}

/// A cleaned itinerary together with the request that produced it.
#[derive(Debug, Clone)]
pub struct GeneratedPlan {
    pub request: PlanRequest,
    pub plan_html: String,
    /// UTC calendar date the plan was generated on.
    pub issued_on: NaiveDate,
}

/// Success body of the form action.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormPlanResult {
    pub plan_html: String,
    pub destination: String,
    pub duration: u32,
    pub budget: String,
    pub interests: Option<String>,
    pub travel_style: String,
    /// `YYYY-MM-DD`
    pub date: String,
}

impl From<GeneratedPlan> for FormPlanResult {
    fn from(plan: GeneratedPlan) -> Self {
        Self {
            plan_html: plan.plan_html,
            destination: plan.request.destination,
            duration: plan.request.duration,
            budget: plan.request.budget,
            interests: plan.request.interests,
            travel_style: plan.request.travel_style,
            date: plan.issued_on.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Success body of `POST /api/generate-plan`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPlanResult {
    pub destination: String,
    pub duration: u32,
    pub budget: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<String>,
    pub travel_style: String,
    pub plan_html: String,
}

impl From<GeneratedPlan> for ApiPlanResult {
    fn from(plan: GeneratedPlan) -> Self {
        Self {
            destination: plan.request.destination,
            duration: plan.request.duration,
            budget: plan.request.budget,
            interests: plan.request.interests,
            travel_style: plan.request.travel_style,
            plan_html: plan.plan_html,
        }
    }
}
