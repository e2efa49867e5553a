use super::http_client;
use super::tts_repository::{TtsError, TtsRepository};
use crate::domain::tts::{split_into_chunks, TtsProviderName};
use async_trait::async_trait;
use std::time::Duration;

/// translate_tts rejects requests longer than this
const MAX_CHUNK_CHARS: usize = 200;
const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_STEP: Duration = Duration::from_millis(200);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Free Google Translate speech engine, used as the fallback voice
pub struct GoogleTtsRepository {
    host: String,
    lang: String,
    http_client: reqwest::Client,
}

impl GoogleTtsRepository {
    pub fn new(host: String, lang: String) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            lang,
            http_client: http_client(REQUEST_TIMEOUT),
        }
    }

    fn chunk_url(&self, chunk: &str) -> String {
        format!(
            "{}/translate_tts?ie=UTF-8&q={}&tl={}&total=1&idx=0&textlen={}&client=tw-ob&prev=input&ttsspeed=1",
            self.host,
            urlencoding::encode(chunk),
            urlencoding::encode(&self.lang),
            chunk.chars().count()
        )
    }

    async fn fetch_chunk(&self, chunk: &str) -> Result<Vec<u8>, TtsError> {
        let response = self
            .http_client
            .get(self.chunk_url(chunk))
            .send()
            .await
            .map_err(|e| TtsError::new(format!("Google TTS request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TtsError::with_status(
                status.as_u16(),
                format!("Google TTS returned status {}", status),
            ));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| TtsError::new(format!("Google TTS body read failed: {}", e)))?;
        if audio.is_empty() {
            return Err(TtsError::new("Empty audio response from Google TTS"));
        }

        Ok(audio.to_vec())
    }

    /// Up to three attempts with a linear backoff of 200ms per attempt
    async fn fetch_chunk_with_retry(&self, index: usize, chunk: &str) -> Result<Vec<u8>, TtsError> {
        let mut attempt = 1;
        loop {
            match self.fetch_chunk(chunk).await {
                Ok(audio) => return Ok(audio),
                Err(e) if attempt < MAX_ATTEMPTS => {
                    tracing::debug!(
                        chunk_index = index,
                        attempt,
                        error = %e,
                        "Google TTS chunk failed, retrying"
                    );
                    tokio::time::sleep(BACKOFF_STEP * attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl TtsRepository for GoogleTtsRepository {
    fn provider(&self) -> TtsProviderName {
        TtsProviderName::Google
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        let chunks = split_into_chunks(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(TtsError::new("Cannot synthesize empty text"));
        }

        let start_time = std::time::Instant::now();
        let mut merged_audio = Vec::new();
        for (index, chunk) in chunks.iter().enumerate() {
            let audio = self.fetch_chunk_with_retry(index, chunk).await?;
            merged_audio.extend(audio);
        }

        tracing::info!(
            provider = "google",
            chunks = chunks.len(),
            audio_size = merged_audio.len(),
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Speech synthesized"
        );

        Ok(merged_audio)
    }
}
