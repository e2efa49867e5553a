use super::error::{JobServiceError, RunnerError};
use super::model::{CoverJobInput, Job, JobInput, JobKind, JobOutput, StoryJobInput};
use super::service::JobServiceApi;
use crate::domain::content::{prompts, CoverSpec, StoryDoc};
use crate::domain::llm::{hedge_json, ConcurrencyGateRegistry, ProviderRegistry};
use crate::infrastructure::repositories::StoryRepository;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub batch_size: i64,
    pub loop_delay: Duration,
}

/// Worker loop that drains one job kind from the queue
pub struct Runner {
    jobs: Arc<dyn JobServiceApi>,
    story_repo: Arc<dyn StoryRepository>,
    providers: ProviderRegistry,
    gates: Arc<ConcurrencyGateRegistry>,
    config: RunnerConfig,
}

impl Runner {
    pub fn new(
        jobs: Arc<dyn JobServiceApi>,
        story_repo: Arc<dyn StoryRepository>,
        providers: ProviderRegistry,
        gates: Arc<ConcurrencyGateRegistry>,
        config: RunnerConfig,
    ) -> Self {
        Self {
            jobs,
            story_repo,
            providers,
            gates,
            config,
        }
    }

    /// Claim, process and sleep, forever. Storage errors never end the loop.
    pub async fn run(&self, kind: JobKind) {
        tracing::info!(
            kind = %kind,
            batch = self.config.batch_size,
            delay_ms = self.config.loop_delay.as_millis() as u64,
            providers = ?self.providers.provider_names(kind),
            "Runner loop starting"
        );

        loop {
            if let Err(e) = self.tick(kind).await {
                tracing::error!(kind = %kind, error = %e, "Runner loop error");
                tokio::time::sleep(self.config.loop_delay).await;
            }
            tokio::time::sleep(self.config.loop_delay).await;
        }
    }

    /// One iteration: claim a batch and process every job in it concurrently.
    ///
    /// Returns how many jobs were claimed.
    pub async fn tick(&self, kind: JobKind) -> Result<usize, JobServiceError> {
        let batch = self.jobs.claim_batch(kind, self.config.batch_size).await?;
        if batch.is_empty() {
            return Ok(0);
        }

        let claimed = batch.len();
        tracing::debug!(kind = %kind, claimed, "Claimed jobs");
        join_all(batch.into_iter().map(|job| self.run_job(job))).await;

        Ok(claimed)
    }

    async fn run_job(&self, job: Job) {
        let start_time = std::time::Instant::now();
        let outcome = match self.dispatch(&job).await {
            Ok(output) => self.jobs.complete(job.id, output).await.map_err(RunnerError::from),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => tracing::info!(
                job_id = %job.id,
                kind = %job.kind,
                duration_ms = start_time.elapsed().as_millis() as u64,
                "Job succeeded"
            ),
            Err(e) => {
                let message = e.to_string();
                tracing::error!(
                    job_id = %job.id,
                    kind = %job.kind,
                    error = %message,
                    "Job failed"
                );
                if let Err(fail_err) = self.jobs.fail(job.id, &message).await {
                    tracing::error!(
                        job_id = %job.id,
                        error = %fail_err,
                        "Could not record job failure"
                    );
                }
            }
        }
    }

    async fn dispatch(&self, job: &Job) -> Result<JobOutput, RunnerError> {
        let input = job.parsed_input().map_err(|errors| {
            let fields: Vec<String> = errors
                .iter()
                .map(|e| format!("{} {}", e.field, e.message))
                .collect();
            RunnerError::InvalidInput(fields.join(", "))
        })?;

        match input {
            JobInput::Story(input) => self.run_story(&input).await,
            JobInput::Cover(input) => self.run_cover(&input).await,
        }
    }

    async fn run_story(&self, input: &StoryJobInput) -> Result<JobOutput, RunnerError> {
        let hedged = hedge_json::<StoryDoc>(
            &self.gates,
            self.providers.providers_for(JobKind::Story),
            prompts::story_system(),
            &prompts::story_user(input),
        )
        .await?;

        self.story_repo
            .upsert_story(&hedged.data)
            .await
            .map_err(|e| RunnerError::Storage(e.to_string()))?;

        Ok(JobOutput {
            provider: hedged.provider,
            slug: hedged.data.slug,
        })
    }

    async fn run_cover(&self, input: &CoverJobInput) -> Result<JobOutput, RunnerError> {
        let hedged = hedge_json::<CoverSpec>(
            &self.gates,
            self.providers.providers_for(JobKind::Cover),
            prompts::cover_system(),
            &prompts::cover_user(input),
        )
        .await?;

        let attached = self
            .story_repo
            .attach_cover(&input.slug, &hedged.data)
            .await
            .map_err(|e| RunnerError::Storage(e.to_string()))?;
        if !attached {
            return Err(RunnerError::StoryMissing(input.slug.clone()));
        }

        Ok(JobOutput {
            provider: hedged.provider,
            slug: input.slug.clone(),
        })
    }
}
