use service_core::observability::init_tracing;
use trip_planner::config::PlannerConfig;
use trip_planner::services::metrics::init_metrics;
use trip_planner::startup::Application;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Fail fast: a missing API key must stop startup, not individual requests
    let config = PlannerConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "trip-planner",
        &config.common.log_level,
        config.otlp_endpoint.as_deref(),
    );
    init_metrics();

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        anyhow::anyhow!("Startup error: {}", e)
    })?;

    app.run_until_stopped().await?;

    Ok(())
}
