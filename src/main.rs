use learnflow_backend::infrastructure::bootstrap::AppContext;
use learnflow_backend::infrastructure::config::Config;
use learnflow_backend::infrastructure::http::start_http_server;
use learnflow_backend::infrastructure::logging::init_logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config, "learnflow_backend=debug,tower_http=debug");

    tracing::info!(
        backend = ?config.storage_backend,
        environment = ?config.environment,
        "Starting LearnFlow Backend on {}:{}",
        config.host,
        config.port
    );

    // Repositories, vendors and gates
    let ctx = AppContext::build(config).await?;
    tracing::info!(
        premium_tts = ctx.premium_tts.is_some(),
        "Application context ready"
    );

    // Start HTTP server with all routes
    start_http_server(&ctx).await?;

    Ok(())
}
