pub mod cleanup;
pub mod metrics;
pub mod planner;
pub mod providers;

pub use cleanup::CleanupProfile;
pub use planner::PlanService;
