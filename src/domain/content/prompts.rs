use crate::domain::jobs::{CoverJobInput, StoryJobInput};

const STORY_SYSTEM_PROMPT: &str = "\
You are a content generator for LearnFlow.
Produce original B1-B2 English stories (~12-15 minutes reading),
with a 3-4 line Hebrew TL;DR. Avoid copyrighted plots, quotes, or book titles.
Return STRICT JSON only that matches the given schema keys. No explanations.
Before returning, internally self-check: (1) B1-B2 readability, (2) safety & age-appropriateness,
(3) originality (no known titles/characters), (4) length targets. If any check fails, fix and only then return JSON.";

const COVER_SYSTEM_PROMPT: &str = "\
You design programmatic, copyright-safe, text-only book covers as JSON specs
for an SVG renderer. Focus on abstract geometric compositions. No people, no logos.
Return STRICT JSON only.";

pub fn story_system() -> &'static str {
    STORY_SYSTEM_PROMPT
}

pub fn story_user(input: &StoryJobInput) -> String {
    let genre = input.genre.as_deref().unwrap_or("general fiction");
    format!(
        r#"Goal: Create one story about: "{topic}"
Constraints:
- English body length target: 1800-2200 words, level {level} (B1/B2)
- Structure: 4-6 sections with short headings
- Include: 5 MCQ comprehension questions; vocabulary list (<=15 items) with Hebrew translations
- Include: Hebrew TL;DR of 3-4 short lines
- Genre: {genre}
- Reading minutes: {minutes}
- Topics tags: 1-5 tags
Output JSON object with these keys ONLY:
{{
  "slug": string (url-safe),
  "title_en": string (<=70 chars),
  "level": "B1"|"B2",
  "reading_minutes": number (10-20),
  "genre": string,
  "hook": string (20-160 chars),
  "tldr_he": string (60-400 chars),
  "body_en": string (~1800-2200 words),
  "sections": [{{"heading": string, "text": string}}] (length 4-6),
  "vocab": [{{"word": string, "pos": string, "he": string, "en"?: string}}] (<=15),
  "quiz": [{{"q": string, "a": [string,string,string,string], "correct": 0|1|2|3}}] (length 5),
  "topics": [string, ... up to 5]
}}
Return strictly JSON without markdown code fences."#,
        topic = input.topic,
        level = input.level,
        genre = genre,
        minutes = input.minutes,
    )
}

pub fn cover_system() -> &'static str {
    COVER_SYSTEM_PROMPT
}

pub fn cover_user(input: &CoverJobInput) -> String {
    format!(
        r##"Create a cover spec for the story:
Title: "{title}"
Genre: "{genre}"
Mood: based on this hook: "{hook}"
Constraints:
- Palette: bg, fg, accent as hex
- Motif: one of ["abstract","city","forest","ocean","mountains"]
- Shapes: 1-3 entries with {{type:["circle","rect","wave","arc"], count:3-40, sizeRange:[min,max], noise:0-1}}
- Typography: {{titleCase:["uppercase","title","sentence"], weight:300-900, letterSpacing:-1..1}}
- Seed: integer
JSON keys ONLY:
{{
  "seed": number,
  "palette": {{ "bg": "#RRGGBB", "fg": "#RRGGBB", "accent": "#RRGGBB" }},
  "motif": "abstract"|"city"|"forest"|"ocean"|"mountains",
  "shapes": [{{ "type": "circle"|"rect"|"wave"|"arc", "count": number, "sizeRange": [number,number], "noise": number }}],
  "typography": {{ "titleCase": "uppercase"|"title"|"sentence", "weight": number, "letterSpacing": number }}
}}
Return strictly JSON without markdown code fences."##,
        title = input.title_en,
        genre = input.genre,
        hook = input.hook,
    )
}
