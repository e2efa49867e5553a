pub mod content;
pub mod events;
pub mod jobs;
pub mod llm;
pub mod tts;
