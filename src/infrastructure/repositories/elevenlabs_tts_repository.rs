use super::http_client;
use super::tts_repository::{TtsError, TtsRepository};
use crate::domain::tts::TtsProviderName;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::Serialize;
use std::time::Duration;

/// Upper bound for one synthesis request, body download included
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct SynthesizePayload<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
    output_format: &'a str,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

/// ElevenLabs voice-clone synthesis
pub struct ElevenLabsTtsRepository {
    api_key: String,
    voice_id: String,
    model_id: String,
    base_url: String,
    http_client: reqwest::Client,
}

impl ElevenLabsTtsRepository {
    pub fn new(api_key: String, voice_id: String, model_id: String, base_url: String) -> Self {
        Self {
            api_key,
            voice_id,
            model_id,
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client: http_client(REQUEST_TIMEOUT),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.http_client = http_client(timeout);
        self
    }
}

#[async_trait]
impl TtsRepository for ElevenLabsTtsRepository {
    fn provider(&self) -> TtsProviderName {
        TtsProviderName::ElevenLabs
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        let start_time = std::time::Instant::now();
        let endpoint = format!("{}/v1/text-to-speech/{}", self.base_url, self.voice_id);
        let payload = SynthesizePayload {
            text,
            model_id: &self.model_id,
            voice_settings: VoiceSettings {
                stability: 0.5,
                similarity_boost: 0.5,
            },
            output_format: "mp3",
        };

        let response = self
            .http_client
            .post(&endpoint)
            .header("xi-api-key", &self.api_key)
            .header("Accept", "audio/mpeg")
            .json(&payload)
            .send()
            .await
            .map_err(|e| TtsError::new(format!("ElevenLabs request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            return Err(parse_error(status.as_u16(), &headers, &body));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| TtsError::new(format!("ElevenLabs body read failed: {}", e)))?
            .to_vec();

        tracing::info!(
            provider = "elevenlabs",
            text_length = text.len(),
            audio_size = audio.len(),
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Speech synthesized"
        );

        Ok(audio)
    }
}

/// Build a `TtsError` from a non-2xx response.
///
/// JSON bodies contribute their `detail` string, other bodies their trimmed
/// text; the status line is used when neither is present.
fn parse_error(status: u16, headers: &HeaderMap, body: &str) -> TtsError {
    let retry_after = headers
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok());
    let is_json = headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.contains("application/json"))
        .unwrap_or(false);

    let detail = if is_json {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| json.get("detail").and_then(|d| d.as_str()).map(str::to_string))
    } else {
        Some(body.trim().to_string()).filter(|text| !text.is_empty())
    };

    TtsError {
        status: Some(status),
        message: detail.unwrap_or_else(|| format!("ElevenLabs returned status {}", status)),
        retry_after,
    }
}
