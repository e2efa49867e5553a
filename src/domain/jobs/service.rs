use super::error::JobServiceError;
use super::model::{EnqueueOutcome, ItemValidationError, Job, JobInput, JobKind, JobOutput, NewJob};
use crate::infrastructure::repositories::JobRepository;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

pub struct JobService {
    job_repo: Arc<dyn JobRepository>,
}

impl JobService {
    pub fn new(job_repo: Arc<dyn JobRepository>) -> Self {
        Self { job_repo }
    }
}

#[async_trait]
pub trait JobServiceApi: Send + Sync {
    /// Validate every item, then insert one queued job per item.
    ///
    /// A single invalid item rejects the whole batch before anything is written.
    async fn enqueue(
        &self,
        kind: JobKind,
        items: Vec<Value>,
    ) -> Result<EnqueueOutcome, JobServiceError>;

    /// Claim up to `limit` queued jobs of `kind`; no job is ever handed out twice
    async fn claim_batch(&self, kind: JobKind, limit: i64) -> Result<Vec<Job>, JobServiceError>;

    async fn complete(&self, id: Uuid, output: JobOutput) -> Result<(), JobServiceError>;

    async fn fail(&self, id: Uuid, message: &str) -> Result<(), JobServiceError>;

    async fn get(&self, id: Uuid) -> Result<Job, JobServiceError>;
}

#[async_trait]
impl JobServiceApi for JobService {
    async fn enqueue(
        &self,
        kind: JobKind,
        items: Vec<Value>,
    ) -> Result<EnqueueOutcome, JobServiceError> {
        if items.is_empty() {
            return Err(JobServiceError::Invalid(
                "items must contain at least one entry".to_string(),
            ));
        }

        let mut inputs = Vec::with_capacity(items.len());
        let mut invalid = Vec::new();
        for (index, item) in items.iter().enumerate() {
            match JobInput::parse(kind, item) {
                Ok(input) => inputs.push(input),
                Err(errors) => invalid.push(ItemValidationError { index, errors }),
            }
        }
        if !invalid.is_empty() {
            return Err(JobServiceError::Validation(invalid));
        }

        let jobs: Vec<NewJob> = inputs.iter().map(NewJob::from_input).collect();
        let job_ids = self
            .job_repo
            .insert_batch(&jobs)
            .await
            .map_err(|e| JobServiceError::Dependency(e.to_string()))?;

        let duplicates: Vec<String> = jobs
            .iter()
            .filter(|job| !job_ids.contains(&job.id))
            .map(|job| job.job_key.clone())
            .collect();

        tracing::info!(
            kind = %kind,
            inserted = job_ids.len(),
            duplicates = duplicates.len(),
            "Jobs enqueued"
        );

        Ok(EnqueueOutcome {
            job_ids,
            duplicates,
        })
    }

    async fn claim_batch(&self, kind: JobKind, limit: i64) -> Result<Vec<Job>, JobServiceError> {
        if limit <= 0 {
            return Ok(Vec::new());
        }
        self.job_repo
            .take_jobs(kind, limit)
            .await
            .map_err(|e| JobServiceError::Dependency(e.to_string()))
    }

    async fn complete(&self, id: Uuid, output: JobOutput) -> Result<(), JobServiceError> {
        let output = serde_json::to_value(&output)
            .map_err(|e| JobServiceError::Invalid(e.to_string()))?;
        let updated = self
            .job_repo
            .mark_succeeded(id, output)
            .await
            .map_err(|e| JobServiceError::Dependency(e.to_string()))?;

        if !updated {
            return Err(self.not_running_or_missing(id).await);
        }
        Ok(())
    }

    async fn fail(&self, id: Uuid, message: &str) -> Result<(), JobServiceError> {
        let updated = self
            .job_repo
            .mark_failed(id, message)
            .await
            .map_err(|e| JobServiceError::Dependency(e.to_string()))?;

        if !updated {
            return Err(self.not_running_or_missing(id).await);
        }
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Job, JobServiceError> {
        self.job_repo
            .find_by_id(id)
            .await
            .map_err(|e| JobServiceError::Dependency(e.to_string()))?
            .ok_or(JobServiceError::NotFound(id))
    }
}

impl JobService {
    async fn not_running_or_missing(&self, id: Uuid) -> JobServiceError {
        match self.job_repo.find_by_id(id).await {
            Ok(Some(_)) => JobServiceError::NotRunning(id),
            Ok(None) => JobServiceError::NotFound(id),
            Err(e) => JobServiceError::Dependency(e.to_string()),
        }
    }
}
