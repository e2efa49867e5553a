use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderCallError {
    #[error("missing credentials: {0}")]
    MissingCredentials(String),
    #[error("{provider} returned status {status}: {body}")]
    Http {
        provider: String,
        status: u16,
        body: String,
    },
    #[error("empty completion")]
    EmptyContent,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// A hosted model that answers a prompt pair with JSON text
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Unique name; providers sharing a name share one concurrency gate
    fn name(&self) -> &str;

    /// Simultaneous calls allowed for this provider; zero or less means unlimited
    fn max_concurrent(&self) -> i32;

    /// Raw completion text, expected to contain a JSON object
    async fn call_json(
        &self,
        system: &str,
        user: &str,
        schema_name: &str,
    ) -> Result<String, ProviderCallError>;
}
