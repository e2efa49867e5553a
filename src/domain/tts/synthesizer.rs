use super::error::TtsServiceError;
use super::model::{PreferredProvider, SynthesizedAsset, TtsProviderName};
use crate::infrastructure::repositories::{BlobStorage, TtsError, TtsRepository};
use std::sync::Arc;

const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// Picks a TTS vendor, falls back from premium to free, and uploads the result
pub struct SpeechSynthesizer {
    premium: Option<Arc<dyn TtsRepository>>,
    free: Arc<dyn TtsRepository>,
    storage: Arc<dyn BlobStorage>,
}

impl SpeechSynthesizer {
    pub fn new(
        premium: Option<Arc<dyn TtsRepository>>,
        free: Arc<dyn TtsRepository>,
        storage: Arc<dyn BlobStorage>,
    ) -> Self {
        Self {
            premium,
            free,
            storage,
        }
    }

    pub async fn synthesize(
        &self,
        text: &str,
        preference: PreferredProvider,
    ) -> Result<(Vec<u8>, TtsProviderName), TtsError> {
        let premium = match preference {
            PreferredProvider::Google => None,
            PreferredProvider::Auto => self.premium.as_ref(),
            PreferredProvider::ElevenLabs => {
                if self.premium.is_none() {
                    tracing::warn!("Premium voice requested but not configured, using free engine");
                }
                self.premium.as_ref()
            }
        };

        if let Some(premium) = premium {
            match premium.synthesize(text).await {
                Ok(audio) => return Ok((audio, premium.provider())),
                Err(e) => {
                    let reason = if e.is_auth_or_quota() {
                        "auth/quota"
                    } else {
                        "provider error"
                    };
                    tracing::warn!(
                        provider = %premium.provider(),
                        reason,
                        status = ?e.status,
                        error = %e,
                        "Premium synthesis failed, using free engine"
                    );
                }
            }
        }

        let audio = self.free.synthesize(text).await?;
        Ok((audio, self.free.provider()))
    }

    /// Synthesize `text` and store it at `path`; upload failures are hard errors
    pub async fn synthesize_to(
        &self,
        text: &str,
        path: &str,
        preference: PreferredProvider,
    ) -> Result<SynthesizedAsset, TtsServiceError> {
        let (audio, provider) = self.synthesize(text, preference).await?;
        let bytes = audio.len();

        self.storage
            .upload(path, audio, AUDIO_CONTENT_TYPE)
            .await?;

        Ok(SynthesizedAsset {
            url: self.storage.public_url(path),
            provider,
            bytes,
        })
    }
}
