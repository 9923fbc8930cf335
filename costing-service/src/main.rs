use costing_service::config::CostingConfig;
use costing_service::services::init_metrics;
use costing_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = CostingConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    let otlp_endpoint = std::env::var("OTLP_ENDPOINT").ok();
    init_tracing(
        "costing-service",
        &config.common.log_level,
        otlp_endpoint.as_deref(),
    );

    init_metrics();

    tracing::info!(
        database = %config.mongodb.database,
        mismatch_tolerance = config.pricing.mismatch_tolerance,
        "Starting costing-service"
    );

    let application = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    application.run_until_stopped().await
}
