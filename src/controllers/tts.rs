use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    controllers::session_id,
    domain::{
        content::StoryCatalog,
        events::{EventLogger, GENERATE_AUDIO},
        tts::{
            AudioService, AudioServiceApi, GenerateAudioRequest, GenerateAudioResponse,
            GenerateStoryAudio, PreferredProvider, SplitMode, TriggerCooldown,
        },
    },
    error::{AppError, AppResult},
    infrastructure::http::RequestId,
};

pub struct TtsController {
    audio_service: Arc<AudioService>,
    catalog: StoryCatalog,
    cooldown: TriggerCooldown,
    events: EventLogger,
}

impl TtsController {
    pub fn new(
        audio_service: Arc<AudioService>,
        catalog: StoryCatalog,
        cooldown: TriggerCooldown,
        events: EventLogger,
    ) -> Self {
        Self {
            audio_service,
            catalog,
            cooldown,
            events,
        }
    }

    /// POST /api/tts/generate - Narrate one story, whole or per section
    pub async fn generate(
        State(controller): State<Arc<TtsController>>,
        Extension(request_id): Extension<RequestId>,
        headers: HeaderMap,
        body: Result<Json<serde_json::Value>, JsonRejection>,
    ) -> AppResult<Json<GenerateAudioResponse>> {
        let Json(body) = body.map_err(|_| AppError::BadRequest("Invalid JSON body".to_string()))?;
        let request: GenerateAudioRequest = serde_json::from_value(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid request: {e}")))?;

        let slug = request
            .slug
            .as_deref()
            .map(str::trim)
            .filter(|slug| !slug.is_empty())
            .ok_or_else(|| AppError::BadRequest("slug is required".to_string()))?
            .to_string();
        let split = match request.split.as_deref() {
            Some(split) => split.parse::<SplitMode>().map_err(AppError::BadRequest)?,
            None => SplitMode::default(),
        };
        let provider = match request.provider.as_deref() {
            Some(provider) => provider
                .parse::<PreferredProvider>()
                .map_err(AppError::BadRequest)?,
            None => PreferredProvider::default(),
        };

        let story = controller
            .catalog
            .find_for_audio(&slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Story \"{slug}\" not found")))?;

        controller
            .cooldown
            .try_acquire(&slug)
            .await
            .map_err(|retry_after_secs| AppError::RateLimitExceeded { retry_after_secs })?;

        let generated = controller
            .audio_service
            .generate_story_audio(GenerateStoryAudio {
                story,
                split,
                provider,
                force: request.force.unwrap_or(false),
            })
            .await;

        let mut result = match generated {
            Ok(result) => result,
            Err(e) => {
                controller.cooldown.release(&slug).await;
                return Err(e.into());
            }
        };

        controller
            .events
            .log(GENERATE_AUDIO, Some(&slug), &session_id(&headers, &request_id));

        let provider = result
            .provider
            .take()
            .map(|used| used.to_string())
            .unwrap_or_else(|| provider.to_string());

        Ok(Json(GenerateAudioResponse {
            split,
            provider,
            result,
        }))
    }
}
