pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use services::PlanService;
use std::sync::Arc;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<PlanService>,
}

impl AppState {
    pub fn new(planner: Arc<PlanService>) -> Self {
        Self { planner }
    }
}
