use async_trait::async_trait;
use learnflow_backend::domain::llm::{ModelProvider, ProviderCallError};
use learnflow_backend::domain::tts::TtsProviderName;
use learnflow_backend::infrastructure::repositories::{TtsError, TtsRepository};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Model provider answering with a canned document per schema name
pub struct MockModelProvider {
    name: String,
    replies: HashMap<&'static str, Value>,
}

impl MockModelProvider {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            replies: HashMap::new(),
        }
    }

    pub fn reply(mut self, schema_name: &'static str, document: Value) -> Self {
        self.replies.insert(schema_name, document);
        self
    }
}

#[async_trait]
impl ModelProvider for MockModelProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_concurrent(&self) -> i32 {
        2
    }

    async fn call_json(
        &self,
        _system: &str,
        _user: &str,
        schema_name: &str,
    ) -> Result<String, ProviderCallError> {
        match self.replies.get(schema_name) {
            Some(document) => Ok(format!("```json\n{document}\n```")),
            None => Err(ProviderCallError::Http {
                provider: self.name.clone(),
                status: 503,
                body: "overloaded".to_string(),
            }),
        }
    }
}

/// TTS engine that echoes the text bytes back, optionally refusing everything
pub struct MockTts {
    provider: TtsProviderName,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockTts {
    pub fn new(provider: TtsProviderName) -> Self {
        Self {
            provider,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TtsRepository for MockTts {
    fn provider(&self) -> TtsProviderName {
        self.provider
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TtsError::with_status(401, "invalid api key"));
        }
        Ok(text.as_bytes().to_vec())
    }
}
