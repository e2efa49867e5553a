pub mod catalog;
pub mod fallback;
pub mod model;
pub mod prompts;
pub mod schema;

pub use catalog::StoryCatalog;
pub use model::{CoverSpec, StoryDoc, StoryLevel, StoryRecord};
pub use schema::{JsonContract, SchemaViolation};
