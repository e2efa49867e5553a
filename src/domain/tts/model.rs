use crate::domain::content::StoryRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    #[default]
    Whole,
    Section,
}

impl FromStr for SplitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "whole" => Ok(SplitMode::Whole),
            "section" => Ok(SplitMode::Section),
            other => Err(format!("unknown split mode '{other}', expected whole or section")),
        }
    }
}

/// Caller's provider preference for a synthesis request
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PreferredProvider {
    /// Premium voice when configured, free engine otherwise
    #[default]
    Auto,
    Google,
    ElevenLabs,
}

impl FromStr for PreferredProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(PreferredProvider::Auto),
            "google" => Ok(PreferredProvider::Google),
            "eleven" | "elevenlabs" => Ok(PreferredProvider::ElevenLabs),
            other => Err(format!(
                "unknown provider '{other}', expected auto, google or elevenlabs"
            )),
        }
    }
}

impl fmt::Display for PreferredProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PreferredProvider::Auto => "auto",
            PreferredProvider::Google => "google",
            PreferredProvider::ElevenLabs => "elevenlabs",
        };
        write!(f, "{name}")
    }
}

/// Vendor that actually produced a piece of audio
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TtsProviderName {
    ElevenLabs,
    Google,
}

impl TtsProviderName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TtsProviderName::ElevenLabs => "elevenlabs",
            TtsProviderName::Google => "google",
        }
    }
}

impl fmt::Display for TtsProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    AudioExists,
    SectionsExist,
    NoSections,
}

/// One uploaded audio object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SynthesizedAsset {
    pub url: String,
    pub provider: TtsProviderName,
    pub bytes: usize,
}

pub type AudioPartMeta = SynthesizedAsset;

pub struct GenerateStoryAudio {
    pub story: StoryRecord,
    pub split: SplitMode,
    pub provider: PreferredProvider,
    pub force: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoryAudioResult {
    pub slug: String,
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SkipReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_parts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<TtsProviderName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts_meta: Option<Vec<AudioPartMeta>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl StoryAudioResult {
    pub fn skipped(slug: &str, reason: SkipReason) -> Self {
        Self {
            slug: slug.to_string(),
            skipped: true,
            reason: Some(reason),
            ..Default::default()
        }
    }
}
