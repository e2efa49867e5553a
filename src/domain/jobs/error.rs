use super::model::ItemValidationError;
use crate::domain::llm::HedgeError;
use crate::error::AppError;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("{} item(s) failed validation", .0.len())]
    Validation(Vec<ItemValidationError>),
    #[error("job {0} not found")]
    NotFound(Uuid),
    #[error("job {0} is not running")]
    NotRunning(Uuid),
}

impl From<AppError> for JobServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => JobServiceError::Invalid(msg),
            _ => JobServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<JobServiceError> for AppError {
    fn from(err: JobServiceError) -> Self {
        match err {
            JobServiceError::Invalid(msg) => AppError::BadRequest(msg),
            JobServiceError::Validation(items) => AppError::Validation {
                message: format!("{} item(s) failed validation", items.len()),
                details: serde_json::to_value(&items).unwrap_or_default(),
            },
            JobServiceError::NotFound(id) => AppError::NotFound(format!("Job {id} not found")),
            JobServiceError::NotRunning(id) => {
                AppError::BadRequest(format!("Job {id} is not running"))
            }
            JobServiceError::Dependency(msg) => AppError::Internal(msg),
        }
    }
}

/// Why a single claimed job failed; the message is stored on the job row
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("invalid job input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Hedge(#[from] HedgeError),
    #[error("content store error: {0}")]
    Storage(String),
    #[error("queue error: {0}")]
    Queue(#[from] JobServiceError),
    #[error("story '{0}' not found")]
    StoryMissing(String),
}
