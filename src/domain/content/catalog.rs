use super::fallback::{fallback_stories, find_fallback_story};
use super::model::StoryRecord;
use crate::error::AppResult;
use crate::infrastructure::repositories::StoryRepository;
use std::sync::Arc;

/// Story lookup for the audio pipeline: content store first, bundled stories second
pub struct StoryCatalog {
    story_repo: Arc<dyn StoryRepository>,
}

impl StoryCatalog {
    pub fn new(story_repo: Arc<dyn StoryRepository>) -> Self {
        Self { story_repo }
    }

    pub async fn find_for_audio(&self, slug: &str) -> AppResult<Option<StoryRecord>> {
        let stored = self
            .story_repo
            .find_for_audio(slug)
            .await?
            .filter(|story| !story.body_en.trim().is_empty());

        if stored.is_some() {
            return Ok(stored);
        }

        let fallback = find_fallback_story(slug);
        if fallback.is_some() {
            tracing::debug!(slug = %slug, "Story served from bundled fallback");
        }
        Ok(fallback)
    }

    /// Stored stories with a body, followed by bundled stories the store lacks
    pub async fn list_for_audio(&self) -> AppResult<Vec<StoryRecord>> {
        let mut stories: Vec<StoryRecord> = self
            .story_repo
            .list_for_audio()
            .await?
            .into_iter()
            .filter(|story| !story.body_en.trim().is_empty())
            .collect();

        let bundled: Vec<StoryRecord> = fallback_stories()
            .into_iter()
            .filter(|fallback| !stories.iter().any(|story| story.slug == fallback.slug))
            .collect();
        stories.extend(bundled);

        Ok(stories)
    }
}
