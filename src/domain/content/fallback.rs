use super::model::StoryRecord;
use std::sync::LazyLock;

/// Bundled stories, available even when the content store has no row
static FALLBACK_STORIES: LazyLock<Vec<StoryRecord>> = LazyLock::new(|| {
    vec![
        StoryRecord {
            slug: "the-night-library".to_string(),
            title_en: "The Night Library".to_string(),
            body_en: [
                "Maya worked at the small library on Hill Street. Every evening she turned off the lights, locked the front door and walked home past the bakery. One night in October she forgot her scarf on the reading table, so she went back.",
                "The door was still locked, but a soft yellow light was coming from the back room. Maya opened the door slowly. An old man was sitting at the table with a pile of maps. He looked up and smiled as if he had been waiting for her.",
                "\"I return a book every year on this night,\" he said. \"I borrowed it fifty years ago and I was never brave enough to bring it back in the daytime.\" He pushed a thin blue book across the table. Inside, the library card had only one name on it.",
                "Maya checked the book in and wrote the date on the card. When she looked up, the chair was empty and the maps were gone. The next morning she found her scarf folded neatly on the front desk, next to a note that said: thank you for staying late.",
            ]
            .join("\n\n"),
            audio_url: None,
            audio_parts: None,
        },
        StoryRecord {
            slug: "a-garden-on-the-roof".to_string(),
            title_en: "A Garden on the Roof".to_string(),
            body_en: [
                "When Daniel moved into the city, the only green thing in his apartment was a plastic plant his sister had given him as a joke. The building had nine floors and a flat roof that nobody used.",
                "In spring he carried a bag of soil up the stairs and planted tomatoes in old paint buckets. His neighbours laughed at first. Then Mrs. Levi from the fourth floor brought basil, and the twins from the seventh floor brought sunflower seeds.",
                "By August the roof was full of leaves, flowers and people. On Friday evenings everyone shared what they had grown. Daniel realised that the garden had given him something the city had not: a reason to knock on his neighbours' doors.",
            ]
            .join("\n\n"),
            audio_url: None,
            audio_parts: None,
        },
    ]
});

pub fn find_fallback_story(slug: &str) -> Option<StoryRecord> {
    FALLBACK_STORIES.iter().find(|story| story.slug == slug).cloned()
}

pub fn fallback_stories() -> Vec<StoryRecord> {
    FALLBACK_STORIES.clone()
}
