pub mod plan;

pub use plan::{
    ApiPlanBody, ApiPlanResult, FormPlanResult, GeneratedPlan, PlanRequest, PlanSubmission,
};
