use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("upload of '{path}' failed: {message}")]
    Upload { path: String, message: String },
    #[error("storage is not configured: {0}")]
    NotConfigured(String),
}

/// Durable object storage for generated audio
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Store `bytes` at `path`, replacing whatever is already there
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<(), StorageError>;

    /// Public URL for an object path
    fn public_url(&self, path: &str) -> String;
}
