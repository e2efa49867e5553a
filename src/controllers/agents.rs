use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::HeaderMap,
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    controllers::session_id,
    domain::{
        events::{EventLogger, ENQUEUE_JOBS},
        jobs::{EnqueueRequest, EnqueueResponse, Job, JobService, JobServiceApi},
    },
    error::{AppError, AppResult},
    infrastructure::http::RequestId,
};

pub struct AgentsController {
    job_service: Arc<JobService>,
    events: EventLogger,
}

impl AgentsController {
    pub fn new(job_service: Arc<JobService>, events: EventLogger) -> Self {
        Self {
            job_service,
            events,
        }
    }

    /// POST /api/agents/enqueue - Validate and queue a batch of generation jobs
    pub async fn enqueue(
        State(controller): State<Arc<AgentsController>>,
        Extension(request_id): Extension<RequestId>,
        headers: HeaderMap,
        body: Result<Json<serde_json::Value>, JsonRejection>,
    ) -> AppResult<Json<EnqueueResponse>> {
        let Json(body) = body.map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;
        let request: EnqueueRequest = serde_json::from_value(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid enqueue request: {e}")))?;

        let outcome = controller
            .job_service
            .enqueue(request.kind, request.items)
            .await?;

        controller
            .events
            .log(ENQUEUE_JOBS, None, &session_id(&headers, &request_id));

        Ok(Json(outcome.into()))
    }

    /// GET /api/agents/jobs/{id} - Current state of one job
    pub async fn get_job(
        State(controller): State<Arc<AgentsController>>,
        Path(id): Path<Uuid>,
    ) -> AppResult<Json<Job>> {
        let job = controller.job_service.get(id).await?;
        Ok(Json(job))
    }
}
