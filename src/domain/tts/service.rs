use super::error::TtsServiceError;
use super::model::{GenerateStoryAudio, SkipReason, SplitMode, StoryAudioResult};
use super::synthesizer::SpeechSynthesizer;
use crate::infrastructure::repositories::StoryRepository;
use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, LazyLock};

static SECTION_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("valid section regex"));

pub struct AudioService {
    story_repo: Arc<dyn StoryRepository>,
    synthesizer: Arc<SpeechSynthesizer>,
    dest_dir: String,
}

impl AudioService {
    pub fn new(
        story_repo: Arc<dyn StoryRepository>,
        synthesizer: Arc<SpeechSynthesizer>,
        dest_dir: String,
    ) -> Self {
        Self {
            story_repo,
            synthesizer,
            dest_dir: dest_dir.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
pub trait AudioServiceApi: Send + Sync {
    /// Produce narration for one story.
    ///
    /// `whole` renders the full body as one file; `section` renders each
    /// blank-line separated section in order, keeping the parts that succeed.
    async fn generate_story_audio(
        &self,
        request: GenerateStoryAudio,
    ) -> Result<StoryAudioResult, TtsServiceError>;
}

#[async_trait]
impl AudioServiceApi for AudioService {
    async fn generate_story_audio(
        &self,
        request: GenerateStoryAudio,
    ) -> Result<StoryAudioResult, TtsServiceError> {
        tracing::info!(
            slug = %request.story.slug,
            split = ?request.split,
            provider = %request.provider,
            force = request.force,
            "Story audio requested"
        );

        match request.split {
            SplitMode::Whole => self.generate_whole(request).await,
            SplitMode::Section => self.generate_sections(request).await,
        }
    }
}

impl AudioService {
    async fn generate_whole(
        &self,
        request: GenerateStoryAudio,
    ) -> Result<StoryAudioResult, TtsServiceError> {
        let story = &request.story;
        if story.audio_url.is_some() && !request.force {
            return Ok(StoryAudioResult::skipped(&story.slug, SkipReason::AudioExists));
        }

        let path = format!("{}/stories/{}.mp3", self.dest_dir, story.slug);
        let asset = self
            .synthesizer
            .synthesize_to(&story.body_en, &path, request.provider)
            .await?;

        self.story_repo
            .set_audio_url(&story.slug, &asset.url)
            .await
            .map_err(|e| TtsServiceError::Dependency(e.to_string()))?;

        tracing::info!(
            slug = %story.slug,
            provider = %asset.provider,
            bytes = asset.bytes,
            "Story audio stored"
        );

        Ok(StoryAudioResult {
            slug: story.slug.clone(),
            skipped: false,
            audio_url: Some(asset.url),
            provider: Some(asset.provider),
            bytes: Some(asset.bytes),
            ..Default::default()
        })
    }

    async fn generate_sections(
        &self,
        request: GenerateStoryAudio,
    ) -> Result<StoryAudioResult, TtsServiceError> {
        let story = &request.story;
        let has_parts = story
            .audio_parts
            .as_ref()
            .is_some_and(|parts| !parts.is_empty());
        if has_parts && !request.force {
            return Ok(StoryAudioResult::skipped(&story.slug, SkipReason::SectionsExist));
        }

        let sections = split_sections(&story.body_en);
        if sections.is_empty() {
            return Ok(StoryAudioResult::skipped(&story.slug, SkipReason::NoSections));
        }

        let mut parts_meta = Vec::new();
        let mut errors = Vec::new();

        // Sequential on purpose: vendors rate-limit per key
        for (index, section) in sections.iter().enumerate() {
            let part = format!("{:02}", index + 1);
            let path = format!(
                "{}/sections/{}/{}-part-{}.mp3",
                self.dest_dir, story.slug, story.slug, part
            );

            match self
                .synthesizer
                .synthesize_to(section, &path, request.provider)
                .await
            {
                Ok(asset) => parts_meta.push(asset),
                Err(e) => {
                    tracing::warn!(
                        slug = %story.slug,
                        part = %part,
                        error = %e,
                        "Section audio failed"
                    );
                    errors.push(format!("part_{}: {}", part, e));
                }
            }
        }

        let errors = (!errors.is_empty()).then_some(errors);
        if parts_meta.is_empty() {
            return Ok(StoryAudioResult {
                slug: story.slug.clone(),
                skipped: true,
                errors,
                ..Default::default()
            });
        }

        let urls: Vec<String> = parts_meta.iter().map(|asset| asset.url.clone()).collect();
        self.story_repo
            .set_audio_parts(&story.slug, &urls)
            .await
            .map_err(|e| TtsServiceError::Dependency(e.to_string()))?;

        tracing::info!(
            slug = %story.slug,
            parts = urls.len(),
            failed = errors.as_ref().map_or(0, Vec::len),
            "Section audio stored"
        );

        Ok(StoryAudioResult {
            slug: story.slug.clone(),
            skipped: false,
            audio_parts: Some(urls),
            parts_meta: Some(parts_meta),
            errors,
            ..Default::default()
        })
    }
}

/// Split a story body on blank lines, dropping empty sections
pub fn split_sections(body: &str) -> Vec<String> {
    SECTION_BREAK
        .split(&body.replace("\r\n", "\n"))
        .map(str::trim)
        .filter(|section| !section.is_empty())
        .map(str::to_string)
        .collect()
}
