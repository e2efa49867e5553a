//! Process-local repositories used by the `memory` storage backend and by tests.

use super::blob_storage::{BlobStorage, StorageError};
use super::event_repository::EventRepository;
use super::job_repository::JobRepository;
use super::story_repository::StoryRepository;
use crate::domain::content::{CoverSpec, StoryDoc, StoryRecord};
use crate::domain::events::Event;
use crate::domain::jobs::{Job, JobKind, JobStatus, NewJob};
use crate::error::AppResult;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// Job queue held in a single mutex; claims are atomic because they happen under the lock
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: Mutex<Vec<Job>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.lock().is_empty()
    }

    fn finish(
        &self,
        id: Uuid,
        status: JobStatus,
        output: Option<Value>,
        error: Option<String>,
    ) -> bool {
        let mut jobs = self.jobs.lock();
        match jobs
            .iter_mut()
            .find(|job| job.id == id && job.status == JobStatus::Running)
        {
            Some(job) => {
                job.status = status;
                job.output = output;
                job.error = error;
                job.finished_at = Some(Utc::now());
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn insert_batch(&self, new_jobs: &[NewJob]) -> AppResult<Vec<Uuid>> {
        let mut jobs = self.jobs.lock();
        let mut inserted = Vec::with_capacity(new_jobs.len());

        for new_job in new_jobs {
            let active = jobs.iter().any(|job| {
                job.job_key.as_deref() == Some(new_job.job_key.as_str())
                    && !job.status.is_terminal()
            });
            if active {
                continue;
            }

            jobs.push(Job {
                id: new_job.id,
                kind: new_job.kind,
                status: JobStatus::Queued,
                job_key: Some(new_job.job_key.clone()),
                input: new_job.input.clone(),
                output: None,
                error: None,
                created_at: Utc::now(),
                started_at: None,
                finished_at: None,
            });
            inserted.push(new_job.id);
        }

        Ok(inserted)
    }

    async fn take_jobs(&self, kind: JobKind, limit: i64) -> AppResult<Vec<Job>> {
        let limit = usize::try_from(limit).unwrap_or(0);
        let mut jobs = self.jobs.lock();
        let now = Utc::now();

        let claimed = jobs
            .iter_mut()
            .filter(|job| job.kind == kind && job.status == JobStatus::Queued)
            .take(limit)
            .map(|job| {
                job.status = JobStatus::Running;
                job.started_at = Some(now);
                job.clone()
            })
            .collect();

        Ok(claimed)
    }

    async fn mark_succeeded(&self, id: Uuid, output: Value) -> AppResult<bool> {
        Ok(self.finish(id, JobStatus::Succeeded, Some(output), None))
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> AppResult<bool> {
        Ok(self.finish(id, JobStatus::Failed, None, Some(error.to_string())))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Job>> {
        Ok(self.jobs.lock().iter().find(|job| job.id == id).cloned())
    }
}

struct StoredStory {
    record: StoryRecord,
    cover: Option<CoverSpec>,
}

#[derive(Default)]
pub struct InMemoryStoryRepository {
    stories: Mutex<HashMap<String, StoredStory>>,
}

impl InMemoryStoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a story row directly
    pub fn insert_record(&self, record: StoryRecord) {
        self.stories
            .lock()
            .insert(record.slug.clone(), StoredStory { record, cover: None });
    }

    pub fn cover_for(&self, slug: &str) -> Option<CoverSpec> {
        self.stories
            .lock()
            .get(slug)
            .and_then(|story| story.cover.clone())
    }
}

#[async_trait]
impl StoryRepository for InMemoryStoryRepository {
    async fn upsert_story(&self, story: &StoryDoc) -> AppResult<()> {
        let mut stories = self.stories.lock();
        let stored = stories
            .entry(story.slug.clone())
            .or_insert_with(|| StoredStory {
                record: StoryRecord {
                    slug: story.slug.clone(),
                    title_en: String::new(),
                    body_en: String::new(),
                    audio_url: None,
                    audio_parts: None,
                },
                cover: None,
            });
        stored.record.title_en = story.title_en.clone();
        stored.record.body_en = story.body_en.clone();
        Ok(())
    }

    async fn attach_cover(&self, slug: &str, cover: &CoverSpec) -> AppResult<bool> {
        match self.stories.lock().get_mut(slug) {
            Some(stored) => {
                stored.cover = Some(cover.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_for_audio(&self, slug: &str) -> AppResult<Option<StoryRecord>> {
        Ok(self
            .stories
            .lock()
            .get(slug)
            .map(|stored| stored.record.clone()))
    }

    async fn list_for_audio(&self) -> AppResult<Vec<StoryRecord>> {
        let mut stories: Vec<StoryRecord> = self
            .stories
            .lock()
            .values()
            .map(|stored| stored.record.clone())
            .collect();
        stories.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(stories)
    }

    async fn set_audio_url(&self, slug: &str, url: &str) -> AppResult<()> {
        if let Some(stored) = self.stories.lock().get_mut(slug) {
            stored.record.audio_url = Some(url.to_string());
            stored.record.audio_parts = None;
        }
        Ok(())
    }

    async fn set_audio_parts(&self, slug: &str, parts: &[String]) -> AppResult<()> {
        if let Some(stored) = self.stories.lock().get_mut(slug) {
            stored.record.audio_parts = Some(parts.to_vec());
            stored.record.audio_url = None;
        }
        Ok(())
    }
}

/// Blob store that keeps uploads in memory and serves them under `base_url`
pub struct InMemoryBlobStorage {
    base_url: String,
    objects: Mutex<Vec<(String, Vec<u8>)>>,
    fail_uploads: Mutex<bool>,
}

impl InMemoryBlobStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: Mutex::new(Vec::new()),
            fail_uploads: Mutex::new(false),
        }
    }

    /// Object paths in upload order
    pub fn paths(&self) -> Vec<String> {
        self.objects
            .lock()
            .iter()
            .map(|(path, _)| path.clone())
            .collect()
    }

    pub fn object(&self, path: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .iter()
            .find(|(stored, _)| stored == path)
            .map(|(_, bytes)| bytes.clone())
    }

    pub fn fail_uploads(&self, fail: bool) {
        *self.fail_uploads.lock() = fail;
    }
}

#[async_trait]
impl BlobStorage for InMemoryBlobStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        if *self.fail_uploads.lock() {
            return Err(StorageError::Upload {
                path: path.to_string(),
                message: "storage unavailable".to_string(),
            });
        }

        let mut objects = self.objects.lock();
        match objects.iter_mut().find(|(stored, _)| stored == path) {
            Some(existing) => existing.1 = bytes,
            None => objects.push((path.to_string(), bytes)),
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[derive(Default)]
pub struct InMemoryEventRepository {
    events: Mutex<Vec<Event>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn record(&self, event: &Event) -> AppResult<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}
