use std::time::Duration;

pub mod blob_storage;
pub mod elevenlabs_tts_repository;
pub mod event_repository;
pub mod google_tts_repository;
pub mod job_repository;
pub mod memory;
pub mod story_repository;
pub mod supabase_blob_storage;
pub mod tts_repository;

pub use blob_storage::{BlobStorage, StorageError};
pub use elevenlabs_tts_repository::ElevenLabsTtsRepository;
pub use event_repository::{EventRepository, PgEventRepository};
pub use google_tts_repository::GoogleTtsRepository;
pub use job_repository::{JobRepository, PgJobRepository};
pub use memory::{
    InMemoryBlobStorage, InMemoryEventRepository, InMemoryJobRepository, InMemoryStoryRepository,
};
pub use story_repository::{PgStoryRepository, StoryRepository};
pub use supabase_blob_storage::SupabaseBlobStorage;
pub use tts_repository::{TtsError, TtsRepository};

/// HTTP client for vendor calls, each request bounded by `timeout`
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}

/// A local server that accepts connections and never answers
#[cfg(test)]
pub(crate) async fn unresponsive_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{addr}")
}
