use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::jobs::JobKind;
use crate::domain::llm::ProviderRegistry;
use crate::infrastructure::db::{check_connection, DbPool};

pub struct HealthController {
    pool: Option<Arc<DbPool>>,
    providers: ProviderRegistry,
    premium_tts: bool,
}

impl HealthController {
    pub fn new(pool: Option<Arc<DbPool>>, providers: ProviderRegistry, premium_tts: bool) -> Self {
        Self {
            pool,
            providers,
            premium_tts,
        }
    }

    /// GET /health - Liveness
    pub async fn health() -> impl IntoResponse {
        (StatusCode::OK, "OK")
    }

    /// GET /health/ready - Storage check plus a summary of configured vendors
    pub async fn health_ready(
        State(controller): State<Arc<HealthController>>,
    ) -> impl IntoResponse {
        let database = match &controller.pool {
            Some(pool) => match check_connection(pool).await {
                Ok(_) => "connected",
                Err(e) => {
                    tracing::warn!(error = %e, "Readiness check failed");
                    "disconnected"
                }
            },
            None => "memory",
        };
        let ready = database != "disconnected";

        let body = json!({
            "status": if ready { "ready" } else { "not_ready" },
            "database": database,
            "providers": {
                "story": controller.providers.provider_names(JobKind::Story),
                "cover": controller.providers.provider_names(JobKind::Cover),
            },
            "tts": if controller.premium_tts { "elevenlabs+google" } else { "google" },
        });

        let status = if ready {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        (status, Json(body))
    }
}
