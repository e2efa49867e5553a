use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::content::StoryLevel;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Story,
    Cover,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Story => "story",
            JobKind::Cover => "cover",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for JobKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "story" => Ok(JobKind::Story),
            "cover" => Ok(JobKind::Cover),
            other => Err(format!("unknown job kind '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A row of the `agent_runs` queue
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Job {
    pub id: Uuid,
    pub kind: JobKind,
    pub status: JobStatus,
    pub job_key: Option<String>,
    pub input: Value,
    pub output: Option<Value>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn parsed_input(&self) -> Result<JobInput, Vec<FieldError>> {
        JobInput::parse(self.kind, &self.input)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoryJobInput {
    pub topic: String,
    pub level: StoryLevel,
    pub minutes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverJobInput {
    pub slug: String,
    pub title_en: String,
    pub genre: String,
    pub hook: String,
}

/// Validated job payload, one variant per job kind
#[derive(Debug, Clone, PartialEq)]
pub enum JobInput {
    Story(StoryJobInput),
    Cover(CoverJobInput),
}

impl JobInput {
    /// Validate a raw enqueue item against the rules of `kind`.
    ///
    /// All field problems are reported at once rather than the first one only.
    pub fn parse(kind: JobKind, raw: &Value) -> Result<Self, Vec<FieldError>> {
        let Some(object) = raw.as_object() else {
            return Err(vec![FieldError::new("item", "must be a JSON object")]);
        };
        let mut errors = Vec::new();

        match kind {
            JobKind::Story => {
                let topic = required_text(object, "topic", 3, &mut errors);
                let level = match object.get("level").and_then(Value::as_str) {
                    Some("B1") => Some(StoryLevel::B1),
                    Some("B2") => Some(StoryLevel::B2),
                    _ => {
                        errors.push(FieldError::new("level", "must be one of B1, B2"));
                        None
                    }
                };
                let minutes = match object.get("minutes") {
                    Some(value) => match integral(value) {
                        Some(m) if (10..=20).contains(&m) => Some(m),
                        Some(_) => {
                            errors.push(FieldError::new("minutes", "must be between 10 and 20"));
                            None
                        }
                        None => {
                            errors.push(FieldError::new("minutes", "must be an integer"));
                            None
                        }
                    },
                    None => {
                        errors.push(FieldError::new("minutes", "is required"));
                        None
                    }
                };
                let genre = match object.get("genre") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(genre)) => Some(genre.clone()),
                    Some(_) => {
                        errors.push(FieldError::new("genre", "must be a string"));
                        None
                    }
                };

                match (topic, level, minutes) {
                    (Some(topic), Some(level), Some(minutes)) if errors.is_empty() => {
                        Ok(JobInput::Story(StoryJobInput {
                            topic,
                            level,
                            minutes,
                            genre,
                        }))
                    }
                    _ => Err(errors),
                }
            }
            JobKind::Cover => {
                let slug = required_text(object, "slug", 1, &mut errors);
                let title_en = required_text(object, "title_en", 1, &mut errors);
                let genre = required_text(object, "genre", 1, &mut errors);
                let hook = required_text(object, "hook", 10, &mut errors);

                match (slug, title_en, genre, hook) {
                    (Some(slug), Some(title_en), Some(genre), Some(hook)) => {
                        Ok(JobInput::Cover(CoverJobInput {
                            slug,
                            title_en,
                            genre,
                            hook,
                        }))
                    }
                    _ => Err(errors),
                }
            }
        }
    }

    pub fn kind(&self) -> JobKind {
        match self {
            JobInput::Story(_) => JobKind::Story,
            JobInput::Cover(_) => JobKind::Cover,
        }
    }

    /// Deduplication key: `{kind}:{slugify(slug or topic)}`.
    ///
    /// A subject with no letters or digits at all is keyed by a short hash of
    /// its normalized text instead, so distinct subjects never share a key.
    pub fn job_key(&self) -> String {
        let subject = match self {
            JobInput::Story(input) => &input.topic,
            JobInput::Cover(input) => &input.slug,
        };
        let slug = slugify(subject);
        if slug.is_empty() {
            format!("{}:h-{}", self.kind(), subject_hash(subject))
        } else {
            format!("{}:{}", self.kind(), slug)
        }
    }

    pub fn to_value(&self) -> Value {
        let value = match self {
            JobInput::Story(input) => serde_json::to_value(input),
            JobInput::Cover(input) => serde_json::to_value(input),
        };
        value.unwrap_or(Value::Null)
    }
}

/// Any JSON number with an integral value, so `15.0` counts as `15`
fn integral(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.fract() == 0.0 && n.abs() < i64::MAX as f64)
            .map(|n| n as i64)
    })
}

fn required_text(
    object: &serde_json::Map<String, Value>,
    field: &str,
    min_chars: usize,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match object.get(field) {
        Some(Value::String(text)) if text.trim().chars().count() >= min_chars => {
            Some(text.trim().to_string())
        }
        Some(Value::String(_)) => {
            let message = if min_chars <= 1 {
                "must not be blank".to_string()
            } else {
                format!("must be at least {min_chars} characters")
            };
            errors.push(FieldError::new(field, message));
            None
        }
        Some(_) => {
            errors.push(FieldError::new(field, "must be a string"));
            None
        }
        None => {
            errors.push(FieldError::new(field, "is required"));
            None
        }
    }
}

/// Lowercase, collapse every run of non-alphanumerics into one `-`, trim dashes
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;
    for c in value.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn subject_hash(value: &str) -> String {
    let normalized = value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemValidationError {
    pub index: usize,
    pub errors: Vec<FieldError>,
}

/// A validated job ready to be inserted
#[derive(Debug, Clone)]
pub struct NewJob {
    pub id: Uuid,
    pub kind: JobKind,
    pub job_key: String,
    pub input: Value,
}

impl NewJob {
    pub fn from_input(input: &JobInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: input.kind(),
            job_key: input.job_key(),
            input: input.to_value(),
        }
    }
}

/// Output stored on a succeeded job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobOutput {
    pub provider: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnqueueOutcome {
    /// Ids of the rows actually inserted
    pub job_ids: Vec<Uuid>,
    /// Items skipped because a job with the same key is already queued or running
    pub duplicates: Vec<String>,
}
