use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StoryLevel {
    B1,
    B2,
}

impl StoryLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryLevel::B1 => "B1",
            StoryLevel::B2 => "B2",
        }
    }
}

impl std::fmt::Display for StoryLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Generated story document as returned by the story prompt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoryDoc {
    pub slug: String,
    pub title_en: String,
    pub level: StoryLevel,
    pub reading_minutes: f64,
    pub genre: String,
    pub hook: String,
    pub tldr_he: String,
    pub body_en: String,
    pub sections: Vec<StorySection>,
    pub vocab: Vec<StoryVocabEntry>,
    pub quiz: Vec<StoryQuizQuestion>,
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorySection {
    pub heading: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoryVocabEntry {
    pub word: String,
    pub pos: String,
    pub he: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoryQuizQuestion {
    pub q: String,
    pub a: Vec<String>,
    pub correct: u8,
}

/// Programmatic cover description consumed by the SVG renderer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverSpec {
    pub seed: i64,
    pub palette: Palette,
    pub motif: Motif,
    pub shapes: Vec<CoverShape>,
    pub typography: Typography,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Palette {
    pub bg: String,
    pub fg: String,
    pub accent: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Motif {
    Abstract,
    City,
    Forest,
    Ocean,
    Mountains,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CoverShape {
    #[serde(rename = "type")]
    pub shape_type: ShapeType,
    pub count: i64,
    pub size_range: (f64, f64),
    pub noise: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    Circle,
    Rect,
    Wave,
    Arc,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub title_case: TitleCase,
    pub weight: i64,
    pub letter_spacing: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TitleCase {
    Uppercase,
    Title,
    Sentence,
}

/// The slice of a story row the audio pipeline reads
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct StoryRecord {
    pub slug: String,
    pub title_en: String,
    pub body_en: String,
    pub audio_url: Option<String>,
    pub audio_parts: Option<Vec<String>>,
}
