use crate::infrastructure::repositories::EventRepository;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const ENQUEUE_JOBS: &str = "enqueue_jobs";
pub const GENERATE_AUDIO: &str = "generate_audio";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub event_type: String,
    pub summary_slug: Option<String>,
    pub client_session_id: String,
    pub ts: DateTime<Utc>,
}

/// Best-effort telemetry.
///
/// Writes happen on a detached task; a failed write is logged at debug level
/// and never reaches the caller.
#[derive(Clone)]
pub struct EventLogger {
    repo: Arc<dyn EventRepository>,
}

impl EventLogger {
    pub fn new(repo: Arc<dyn EventRepository>) -> Self {
        Self { repo }
    }

    pub fn log(&self, event_type: &str, summary_slug: Option<&str>, session_id: &str) {
        let event = Event {
            event_type: event_type.to_string(),
            summary_slug: summary_slug.map(str::to_string),
            client_session_id: session_id.to_string(),
            ts: Utc::now(),
        };
        let repo = self.repo.clone();

        tokio::spawn(async move {
            if let Err(e) = repo.record(&event).await {
                tracing::debug!(
                    error = %e,
                    event_type = %event.event_type,
                    "Event logging skipped"
                );
            }
        });
    }
}
