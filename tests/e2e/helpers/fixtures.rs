use learnflow_backend::domain::content::StoryRecord;
use serde_json::{json, Value};

pub fn story_record(slug: &str, body: &str) -> StoryRecord {
    StoryRecord {
        slug: slug.to_string(),
        title_en: format!("Story {slug}"),
        body_en: body.to_string(),
        audio_url: None,
        audio_parts: None,
    }
}

pub fn cover_item(slug: &str) -> Value {
    json!({
        "slug": slug,
        "title_en": "T",
        "genre": "G",
        "hook": "H that is at least ten chars"
    })
}

pub fn story_item(topic: &str) -> Value {
    json!({ "topic": topic, "level": "B1", "minutes": 12, "genre": "mystery" })
}

pub fn cover_document() -> Value {
    json!({
        "seed": 7,
        "palette": { "bg": "#0B1D2A", "fg": "#F5F5F5", "accent": "#E07A5F" },
        "motif": "forest",
        "shapes": [
            { "type": "circle", "count": 8, "sizeRange": [2.0, 12.0], "noise": 0.2 },
            { "type": "arc", "count": 3, "sizeRange": [20.0, 40.0], "noise": 0.6 }
        ],
        "typography": { "titleCase": "uppercase", "weight": 700, "letterSpacing": 0.1 }
    })
}

pub fn story_document(slug: &str) -> Value {
    let paragraph =
        "Noa walked to the harbour every morning and wrote down the names of the boats. ".repeat(4);
    let sections: Vec<Value> = (1..=4)
        .map(|i| json!({ "heading": format!("Chapter {i}"), "text": paragraph.clone() }))
        .collect();
    let quiz: Vec<Value> = (0..5)
        .map(|i| {
            json!({
                "q": format!("What happened in part {}?", i + 1),
                "a": ["A boat left", "It rained", "Noa slept", "Nothing"],
                "correct": i % 4
            })
        })
        .collect();

    json!({
        "slug": slug,
        "title_en": "The Harbour List",
        "level": "B1",
        "reading_minutes": 12,
        "genre": "mystery",
        "hook": "Every boat has a name, except one.",
        "tldr_he": "נועה כותבת כל בוקר את שמות הסירות בנמל, עד שיום אחד מופיעה סירה בלי שם ומשנה את הקיץ שלה.",
        "body_en": paragraph.repeat(4),
        "sections": sections,
        "vocab": [{ "word": "harbour", "pos": "noun", "he": "נמל" }],
        "quiz": quiz,
        "topics": ["sea", "mystery"]
    })
}
