use crate::error::AppError;
use crate::infrastructure::repositories::{StorageError, TtsError};

#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("speech synthesis failed: {0}")]
    Synthesis(#[from] TtsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<AppError> for TtsServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => TtsServiceError::Invalid(msg),
            _ => TtsServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        match err {
            TtsServiceError::Invalid(msg) => AppError::BadRequest(msg),
            TtsServiceError::Dependency(msg) => AppError::Internal(msg),
            TtsServiceError::Synthesis(e) => AppError::ExternalService(e.to_string()),
            TtsServiceError::Storage(e) => AppError::Storage(e.to_string()),
        }
    }
}
