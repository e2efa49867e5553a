use super::provider::ModelProvider;
use crate::domain::jobs::JobKind;
use std::collections::HashMap;
use std::sync::Arc;

/// Which model providers race for each job kind
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    by_kind: HashMap<JobKind, Vec<Arc<dyn ModelProvider>>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, kind: JobKind, providers: Vec<Arc<dyn ModelProvider>>) -> Self {
        self.by_kind.insert(kind, providers);
        self
    }

    /// Empty when nothing is registered; hedging then reports no providers
    pub fn providers_for(&self, kind: JobKind) -> &[Arc<dyn ModelProvider>] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn provider_names(&self, kind: JobKind) -> Vec<String> {
        self.providers_for(kind)
            .iter()
            .map(|provider| provider.name().to_string())
            .collect()
    }
}
