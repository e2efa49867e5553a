pub mod chunker;
pub mod cooldown;
pub mod error;
pub mod model;
pub mod service;
pub mod synthesizer;

pub use chunker::split_into_chunks;
pub use cooldown::TriggerCooldown;
pub use error::TtsServiceError;
pub use model::{
    AudioPartMeta, GenerateStoryAudio, PreferredProvider, SkipReason, SplitMode,
    StoryAudioResult, SynthesizedAsset, TtsProviderName,
};
pub use service::{AudioService, AudioServiceApi};
pub use synthesizer::SpeechSynthesizer;

use serde::{Deserialize, Serialize};

/// Request for POST /api/tts/generate
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerateAudioRequest {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub split: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub force: Option<bool>,
}

/// Response for POST /api/tts/generate
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateAudioResponse {
    pub split: SplitMode,
    /// Vendor that produced the audio, or the requested preference when nothing ran
    pub provider: String,
    #[serde(flatten)]
    pub result: StoryAudioResult,
}
