use super::model::{CoverSpec, StoryDoc};
use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid slug regex"));
static HEX_COLOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid color regex"));

/// A JSON payload an LLM is asked to produce.
///
/// Deserialization covers shape and types; `validate` covers the value
/// constraints serde cannot express (lengths, ranges, patterns).
pub trait JsonContract: DeserializeOwned + Send {
    const NAME: &'static str;

    fn validate(&self) -> Result<(), SchemaViolation>;
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{schema} violated: {}", .issues.join("; "))]
pub struct SchemaViolation {
    pub schema: &'static str,
    pub issues: Vec<String>,
}

/// Collects constraint violations for one document
struct Issues {
    schema: &'static str,
    issues: Vec<String>,
}

impl Issues {
    fn new(schema: &'static str) -> Self {
        Self {
            schema,
            issues: Vec::new(),
        }
    }

    fn text(&mut self, field: &str, value: &str, min: usize, max: Option<usize>) {
        let len = value.chars().count();
        if len < min {
            self.issues
                .push(format!("{field} must be at least {min} characters (got {len})"));
        }
        if let Some(max) = max {
            if len > max {
                self.issues
                    .push(format!("{field} must be at most {max} characters (got {len})"));
            }
        }
    }

    fn count(&mut self, field: &str, len: usize, min: usize, max: usize) {
        if len < min || len > max {
            if min == max {
                self.issues
                    .push(format!("{field} must contain exactly {min} items (got {len})"));
            } else {
                self.issues
                    .push(format!("{field} must contain {min}-{max} items (got {len})"));
            }
        }
    }

    fn range(&mut self, field: &str, value: f64, min: f64, max: f64) {
        if !(min..=max).contains(&value) {
            self.issues
                .push(format!("{field} must be between {min} and {max} (got {value})"));
        }
    }

    fn pattern(&mut self, field: &str, value: &str, pattern: &Regex, hint: &str) {
        if !pattern.is_match(value) {
            self.issues.push(format!("{field} {hint}"));
        }
    }

    fn finish(self) -> Result<(), SchemaViolation> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(SchemaViolation {
                schema: self.schema,
                issues: self.issues,
            })
        }
    }
}

impl JsonContract for StoryDoc {
    const NAME: &'static str = "StoryDoc";

    fn validate(&self) -> Result<(), SchemaViolation> {
        let mut issues = Issues::new(Self::NAME);

        issues.pattern("slug", &self.slug, &SLUG_PATTERN, "must be url-safe");
        issues.text("title_en", &self.title_en, 3, Some(70));
        issues.range("reading_minutes", self.reading_minutes, 10.0, 20.0);
        issues.text("genre", &self.genre, 3, Some(60));
        issues.text("hook", &self.hook, 20, Some(160));
        issues.text("tldr_he", &self.tldr_he, 60, Some(400));
        issues.text("body_en", &self.body_en, 1000, None);

        issues.count("sections", self.sections.len(), 4, 6);
        for (i, section) in self.sections.iter().enumerate() {
            issues.text(&format!("sections[{i}].heading"), &section.heading, 3, Some(120));
            issues.text(&format!("sections[{i}].text"), &section.text, 200, None);
        }

        issues.count("vocab", self.vocab.len(), 0, 15);
        for (i, entry) in self.vocab.iter().enumerate() {
            issues.text(&format!("vocab[{i}].word"), &entry.word, 1, Some(60));
            issues.text(&format!("vocab[{i}].pos"), &entry.pos, 1, Some(20));
            issues.text(&format!("vocab[{i}].he"), &entry.he, 1, Some(120));
            if let Some(en) = &entry.en {
                issues.text(&format!("vocab[{i}].en"), en, 1, Some(200));
            }
        }

        issues.count("quiz", self.quiz.len(), 5, 5);
        for (i, question) in self.quiz.iter().enumerate() {
            issues.text(&format!("quiz[{i}].q"), &question.q, 5, Some(200));
            issues.count(&format!("quiz[{i}].a"), question.a.len(), 4, 4);
            for (j, answer) in question.a.iter().enumerate() {
                issues.text(&format!("quiz[{i}].a[{j}]"), answer, 1, Some(200));
            }
            if question.correct > 3 {
                issues
                    .issues
                    .push(format!("quiz[{i}].correct must be 0, 1, 2 or 3"));
            }
        }

        issues.count("topics", self.topics.len(), 1, 5);
        for (i, topic) in self.topics.iter().enumerate() {
            issues.text(&format!("topics[{i}]"), topic, 2, Some(40));
        }

        issues.finish()
    }
}

impl JsonContract for CoverSpec {
    const NAME: &'static str = "CoverSpec";

    fn validate(&self) -> Result<(), SchemaViolation> {
        let mut issues = Issues::new(Self::NAME);
        let hint = "must be a #RRGGBB hex value";

        issues.pattern("palette.bg", &self.palette.bg, &HEX_COLOR_PATTERN, hint);
        issues.pattern("palette.fg", &self.palette.fg, &HEX_COLOR_PATTERN, hint);
        issues.pattern("palette.accent", &self.palette.accent, &HEX_COLOR_PATTERN, hint);

        issues.count("shapes", self.shapes.len(), 1, 3);
        for (i, shape) in self.shapes.iter().enumerate() {
            issues.range(&format!("shapes[{i}].count"), shape.count as f64, 3.0, 40.0);
            issues.range(&format!("shapes[{i}].noise"), shape.noise, 0.0, 1.0);
            let (min, max) = shape.size_range;
            if min <= 0.0 || max <= 0.0 {
                issues
                    .issues
                    .push(format!("shapes[{i}].sizeRange values must be positive"));
            }
            if max < min {
                issues
                    .issues
                    .push(format!("shapes[{i}].sizeRange max must be >= min"));
            }
        }

        issues.range(
            "typography.weight",
            self.typography.weight as f64,
            300.0,
            900.0,
        );
        issues.range(
            "typography.letterSpacing",
            self.typography.letter_spacing,
            -1.0,
            1.0,
        );

        issues.finish()
    }
}
