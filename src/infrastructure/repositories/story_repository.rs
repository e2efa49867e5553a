use crate::domain::content::{CoverSpec, StoryDoc, StoryRecord};
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use sqlx::types::Json;
use std::sync::Arc;

/// Content store for generated stories (`stories` table)
#[async_trait]
pub trait StoryRepository: Send + Sync {
    /// Insert or replace the story identified by `story.slug`
    async fn upsert_story(&self, story: &StoryDoc) -> AppResult<()>;

    /// Attach a cover to an existing story. Returns false when no row has that slug.
    async fn attach_cover(&self, slug: &str, cover: &CoverSpec) -> AppResult<bool>;

    async fn find_for_audio(&self, slug: &str) -> AppResult<Option<StoryRecord>>;

    /// Every stored story, ordered by slug
    async fn list_for_audio(&self) -> AppResult<Vec<StoryRecord>>;

    /// Store a whole-story audio URL, clearing any section parts
    async fn set_audio_url(&self, slug: &str, url: &str) -> AppResult<()>;

    /// Store ordered section audio URLs, clearing any whole-story URL
    async fn set_audio_parts(&self, slug: &str, parts: &[String]) -> AppResult<()>;
}

pub struct PgStoryRepository {
    pool: Arc<DbPool>,
}

impl PgStoryRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoryRepository for PgStoryRepository {
    async fn upsert_story(&self, story: &StoryDoc) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            INSERT INTO stories (
                slug, title_en, level, reading_minutes, genre, hook, tldr_he,
                body_en, sections, vocab, quiz, topics, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, NOW())
            ON CONFLICT (slug) DO UPDATE SET
                title_en = EXCLUDED.title_en,
                level = EXCLUDED.level,
                reading_minutes = EXCLUDED.reading_minutes,
                genre = EXCLUDED.genre,
                hook = EXCLUDED.hook,
                tldr_he = EXCLUDED.tldr_he,
                body_en = EXCLUDED.body_en,
                sections = EXCLUDED.sections,
                vocab = EXCLUDED.vocab,
                quiz = EXCLUDED.quiz,
                topics = EXCLUDED.topics,
                updated_at = NOW()
            "#,
        )
        .bind(&story.slug)
        .bind(&story.title_en)
        .bind(story.level.as_str())
        .bind(story.reading_minutes)
        .bind(&story.genre)
        .bind(&story.hook)
        .bind(&story.tldr_he)
        .bind(&story.body_en)
        .bind(Json(&story.sections))
        .bind(Json(&story.vocab))
        .bind(Json(&story.quiz))
        .bind(&story.topics)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn attach_cover(&self, slug: &str, cover: &CoverSpec) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE stories
            SET cover_spec = $2, updated_at = NOW()
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .bind(Json(cover))
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_for_audio(&self, slug: &str) -> AppResult<Option<StoryRecord>> {
        let pool = self.pool.as_ref();
        let story = sqlx::query_as::<_, StoryRecord>(
            r#"
            SELECT slug, title_en, body_en, audio_url, audio_parts
            FROM stories
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(pool)
        .await?;

        Ok(story)
    }

    async fn list_for_audio(&self) -> AppResult<Vec<StoryRecord>> {
        let pool = self.pool.as_ref();
        let stories = sqlx::query_as::<_, StoryRecord>(
            r#"
            SELECT slug, title_en, body_en, audio_url, audio_parts
            FROM stories
            ORDER BY slug
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(stories)
    }

    async fn set_audio_url(&self, slug: &str, url: &str) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            UPDATE stories
            SET audio_url = $2, audio_parts = NULL, updated_at = NOW()
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .bind(url)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn set_audio_parts(&self, slug: &str, parts: &[String]) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            UPDATE stories
            SET audio_parts = $2, audio_url = NULL, updated_at = NOW()
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .bind(parts)
        .execute(pool)
        .await?;

        Ok(())
    }
}
