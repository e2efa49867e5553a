use crate::domain::tts::TtsProviderName;
use async_trait::async_trait;

/// Failure of a single vendor synthesis call
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct TtsError {
    pub status: Option<u16>,
    pub message: String,
    pub retry_after: Option<u64>,
}

impl TtsError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            retry_after: None,
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
            retry_after: None,
        }
    }

    /// 401 and 402 mean the key is wrong or the account is out of credit
    pub fn is_auth_or_quota(&self) -> bool {
        matches!(self.status, Some(401) | Some(402))
    }
}

/// Repository for TTS synthesis operations.
///
/// Implementations handle their vendor's text length limits themselves and
/// return one merged MP3 stream.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    fn provider(&self) -> TtsProviderName;

    /// Synthesize whitespace-normalised text to MP3 bytes
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError>;
}
