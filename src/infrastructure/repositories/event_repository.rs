use crate::domain::events::Event;
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn record(&self, event: &Event) -> AppResult<()>;
}

pub struct PgEventRepository {
    pool: Arc<DbPool>,
}

impl PgEventRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn record(&self, event: &Event) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            INSERT INTO events (event_type, summary_slug, client_session_id, ts)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&event.event_type)
        .bind(&event.summary_slug)
        .bind(&event.client_session_id)
        .bind(event.ts)
        .execute(pool)
        .await?;

        Ok(())
    }
}
