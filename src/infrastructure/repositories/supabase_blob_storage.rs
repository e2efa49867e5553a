use super::blob_storage::{BlobStorage, StorageError};
use super::http_client;
use async_trait::async_trait;
use std::time::Duration;

const CACHE_CONTROL: &str = "max-age=31536000";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Supabase Storage over its REST API
pub struct SupabaseBlobStorage {
    base_url: String,
    service_role_key: String,
    bucket: String,
    http_client: reqwest::Client,
}

impl SupabaseBlobStorage {
    pub fn new(base_url: String, service_role_key: String, bucket: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_role_key,
            bucket,
            http_client: http_client(REQUEST_TIMEOUT),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.http_client = http_client(timeout);
        self
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            self.bucket,
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl BlobStorage for SupabaseBlobStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let size = bytes.len();
        let response = self
            .http_client
            .post(self.object_url(path))
            .header("Authorization", format!("Bearer {}", self.service_role_key))
            .header("apikey", &self.service_role_key)
            .header("Content-Type", content_type)
            .header("Cache-Control", CACHE_CONTROL)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StorageError::Upload {
                path: path.to_string(),
                message: format!("{}: {}", status, error_text),
            });
        }

        tracing::debug!(path = %path, size, bucket = %self.bucket, "Object uploaded");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            self.bucket,
            path.trim_start_matches('/')
        )
    }
}
