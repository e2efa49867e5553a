use super::provider::{ModelProvider, ProviderCallError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Model provider with a canned reply, for service tests
pub struct ScriptedProvider {
    name: String,
    reply: Result<String, ProviderCallError>,
    delay: Duration,
    max_concurrent: i32,
    calls: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    finished: Arc<AtomicBool>,
}

impl ScriptedProvider {
    fn new(name: &str, reply: Result<String, ProviderCallError>) -> Self {
        Self {
            name: name.to_string(),
            reply,
            delay: Duration::ZERO,
            max_concurrent: 0,
            calls: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
            finished: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn replying(name: &str, reply: impl Into<String>) -> Self {
        Self::new(name, Ok(reply.into()))
    }

    pub fn failing(name: &str, error: ProviderCallError) -> Self {
        Self::new(name, Err(error))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: i32) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    pub fn peak_in_flight(&self) -> Arc<AtomicUsize> {
        self.peak.clone()
    }

    /// Set once a call has run to completion
    pub fn finished_flag(&self) -> Arc<AtomicBool> {
        self.finished.clone()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_concurrent(&self) -> i32 {
        self.max_concurrent
    }

    async fn call_json(
        &self,
        _system: &str,
        _user: &str,
        _schema_name: &str,
    ) -> Result<String, ProviderCallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.finished.store(true, Ordering::SeqCst);
        self.reply.clone()
    }
}
