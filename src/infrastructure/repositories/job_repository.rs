use crate::domain::jobs::{Job, JobKind, NewJob};
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Persistence for the generation job queue (`agent_runs`)
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Insert all jobs in one transaction.
    ///
    /// Jobs whose key already belongs to a queued or running job are skipped;
    /// returns the ids that were actually inserted.
    async fn insert_batch(&self, jobs: &[NewJob]) -> AppResult<Vec<Uuid>>;

    /// Atomically move up to `limit` queued jobs of `kind` to running, oldest first
    async fn take_jobs(&self, kind: JobKind, limit: i64) -> AppResult<Vec<Job>>;

    /// Mark a running job succeeded. Returns false when the job was not running.
    async fn mark_succeeded(&self, id: Uuid, output: Value) -> AppResult<bool>;

    /// Mark a running job failed. Returns false when the job was not running.
    async fn mark_failed(&self, id: Uuid, error: &str) -> AppResult<bool>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Job>>;
}

pub struct PgJobRepository {
    pool: Arc<DbPool>,
}

impl PgJobRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn insert_batch(&self, jobs: &[NewJob]) -> AppResult<Vec<Uuid>> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(jobs.len());

        for job in jobs {
            let id = sqlx::query_scalar::<_, Uuid>(
                r#"
                INSERT INTO agent_runs (id, kind, status, job_key, input)
                VALUES ($1, $2, 'queued', $3, $4)
                ON CONFLICT (job_key) WHERE status IN ('queued', 'running') DO NOTHING
                RETURNING id
                "#,
            )
            .bind(job.id)
            .bind(job.kind)
            .bind(&job.job_key)
            .bind(&job.input)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(id) = id {
                inserted.push(id);
            }
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn take_jobs(&self, kind: JobKind, limit: i64) -> AppResult<Vec<Job>> {
        let pool = self.pool.as_ref();
        let jobs = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, kind, status, job_key, input, output, error,
                   created_at, started_at, finished_at
            FROM take_agent_jobs($1, $2)
            ORDER BY created_at
            "#,
        )
        .bind(kind)
        .bind(sql_limit(limit))
        .fetch_all(pool)
        .await?;

        Ok(jobs)
    }

    async fn mark_succeeded(&self, id: Uuid, output: Value) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE agent_runs
            SET status = 'succeeded', output = $2, finished_at = NOW()
            WHERE id = $1 AND status = 'running'
            "#,
        )
        .bind(id)
        .bind(output)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE agent_runs
            SET status = 'failed', error = $2, finished_at = NOW()
            WHERE id = $1 AND status = 'running'
            "#,
        )
        .bind(id)
        .bind(error)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Job>> {
        let pool = self.pool.as_ref();
        let job = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, kind, status, job_key, input, output, error,
                   created_at, started_at, finished_at
            FROM agent_runs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(job)
    }
}

/// `take_agent_jobs` takes an INTEGER limit; negative means nothing, oversize saturates
fn sql_limit(limit: i64) -> i32 {
    i32::try_from(limit.max(0)).unwrap_or(i32::MAX)
}
