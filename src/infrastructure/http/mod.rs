pub mod request_id;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::controllers::{agents::AgentsController, health::HealthController, tts::TtsController};
use crate::domain::events::EventLogger;
use crate::domain::jobs::JobService;
use crate::domain::tts::TriggerCooldown;
use crate::infrastructure::bootstrap::AppContext;

/// Wire services and controllers from `ctx` into the application router
pub fn build_router(ctx: &AppContext) -> Router {
    let events = EventLogger::new(ctx.event_repo.clone());

    let job_service = Arc::new(JobService::new(ctx.job_repo.clone()));

    let health_controller = Arc::new(HealthController::new(
        ctx.pool.clone(),
        ctx.providers.clone(),
        ctx.premium_tts.is_some(),
    ));
    let agents_controller = Arc::new(AgentsController::new(job_service, events.clone()));
    let tts_controller = Arc::new(TtsController::new(
        ctx.audio_service(),
        ctx.story_catalog(),
        TriggerCooldown::new(Duration::from_secs(ctx.config.tts_cooldown_secs)),
        events,
    ));

    let health_routes = Router::new()
        .route("/health", get(HealthController::health))
        .route("/health/ready", get(HealthController::health_ready))
        .with_state(health_controller);

    let agent_routes = Router::new()
        .route("/api/agents/enqueue", post(AgentsController::enqueue))
        .route("/api/agents/jobs/:id", get(AgentsController::get_job))
        .with_state(agents_controller);

    let tts_routes = Router::new()
        .route("/api/tts/generate", post(TtsController::generate))
        .with_state(tts_controller);

    Router::new()
        .merge(health_routes)
        .merge(agent_routes)
        .merge(tts_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(ctx: &AppContext) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(ctx);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", ctx.config.host, ctx.config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
