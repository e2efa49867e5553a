pub mod error;
pub mod model;
pub mod runner;
pub mod service;

pub use error::{JobServiceError, RunnerError};
pub use model::{
    slugify, CoverJobInput, EnqueueOutcome, FieldError, ItemValidationError, Job, JobInput,
    JobKind, JobOutput, JobStatus, NewJob, StoryJobInput,
};
pub use runner::{Runner, RunnerConfig};
pub use service::{JobService, JobServiceApi};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct EnqueueRequest {
    pub kind: JobKind,
    pub items: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct EnqueueResponse {
    pub ok: bool,
    pub count: usize,
    pub duplicates: Vec<String>,
    pub job_ids: Vec<Uuid>,
}

impl From<EnqueueOutcome> for EnqueueResponse {
    fn from(outcome: EnqueueOutcome) -> Self {
        Self {
            ok: true,
            count: outcome.job_ids.len(),
            duplicates: outcome.duplicates,
            job_ids: outcome.job_ids,
        }
    }
}
