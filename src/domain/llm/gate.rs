use super::provider::{ModelProvider, ProviderCallError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Per-provider-name concurrency limits shared by every call site.
///
/// Build one at startup and hand it to whatever issues model calls. Waiters are
/// released in arrival order (tokio's semaphore is fair) and a slot is returned
/// when its permit drops, so errors, panics and cancelled futures all free it.
pub struct ConcurrencyGateRegistry {
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    call_timeout: Option<Duration>,
}

impl Default for ConcurrencyGateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConcurrencyGateRegistry {
    pub fn new() -> Self {
        Self {
            gates: Mutex::new(HashMap::new()),
            call_timeout: None,
        }
    }

    /// Bound each gated call (not the wait for a slot) by `timeout`
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// The first registration of a name fixes its limit
    fn gate(&self, name: &str, max_concurrent: i32) -> Option<Arc<Semaphore>> {
        if max_concurrent <= 0 {
            return None;
        }
        let mut gates = self.gates.lock();
        let gate = gates
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(max_concurrent as usize)));
        Some(gate.clone())
    }

    pub async fn with_provider_limit<T, F>(
        &self,
        name: &str,
        max_concurrent: i32,
        call: F,
    ) -> Result<T, ProviderCallError>
    where
        F: Future<Output = Result<T, ProviderCallError>>,
    {
        let _permit = match self.gate(name, max_concurrent) {
            Some(gate) => Some(gate.acquire_owned().await.map_err(|_| {
                ProviderCallError::Transport(format!("concurrency gate for {name} is closed"))
            })?),
            None => None,
        };

        match self.call_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| ProviderCallError::Timeout(limit))?,
            None => call.await,
        }
    }

    pub async fn call_json(
        &self,
        provider: &dyn ModelProvider,
        system: &str,
        user: &str,
        schema_name: &str,
    ) -> Result<String, ProviderCallError> {
        self.with_provider_limit(
            provider.name(),
            provider.max_concurrent(),
            provider.call_json(system, user, schema_name),
        )
        .await
    }
}
