use super::gate::ConcurrencyGateRegistry;
use super::provider::{ModelProvider, ProviderCallError};
use crate::domain::content::{JsonContract, SchemaViolation};
use futures::stream::{FuturesUnordered, StreamExt};
use regex::Regex;
use std::fmt;
use std::sync::{Arc, LazyLock};

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```(?:json)?\s*([\s\S]*?)```").expect("valid fence regex"));

/// Winning attempt of a hedged call
#[derive(Debug, Clone, PartialEq)]
pub struct Hedged<T> {
    pub provider: String,
    pub data: T,
}

#[derive(Debug, thiserror::Error)]
pub enum AttemptError {
    #[error(transparent)]
    Call(#[from] ProviderCallError),
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Schema(#[from] SchemaViolation),
}

#[derive(Debug)]
pub struct ProviderFailure {
    pub provider: String,
    pub reason: AttemptError,
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.provider, self.reason)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HedgeError {
    #[error("No providers configured")]
    NoProvidersConfigured,
    #[error("All providers failed: {}", join_failures(.0))]
    AllProvidersFailed(Vec<ProviderFailure>),
}

fn join_failures(failures: &[ProviderFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Race every provider on the same prompt and keep the first valid answer.
///
/// Each attempt goes through its provider's concurrency gate. Transport
/// errors, unparseable output and schema violations all count as that
/// provider failing. Attempts still running when a winner arrives are dropped.
pub async fn hedge_json<T: JsonContract>(
    gates: &ConcurrencyGateRegistry,
    providers: &[Arc<dyn ModelProvider>],
    system: &str,
    user: &str,
) -> Result<Hedged<T>, HedgeError> {
    if providers.is_empty() {
        return Err(HedgeError::NoProvidersConfigured);
    }

    let mut attempts: FuturesUnordered<_> = providers
        .iter()
        .enumerate()
        .map(|(index, provider)| async move {
            let outcome = attempt::<T>(gates, provider.as_ref(), system, user).await;
            (index, provider.name().to_string(), outcome)
        })
        .collect();

    let mut failures = Vec::with_capacity(providers.len());
    while let Some((index, provider, outcome)) = attempts.next().await {
        match outcome {
            Ok(data) => {
                tracing::info!(
                    provider = %provider,
                    schema = T::NAME,
                    failed_before = failures.len(),
                    "Hedged call won"
                );
                return Ok(Hedged { provider, data });
            }
            Err(reason) => {
                tracing::warn!(
                    provider = %provider,
                    schema = T::NAME,
                    error = %reason,
                    "Provider attempt failed"
                );
                failures.push((index, ProviderFailure { provider, reason }));
            }
        }
    }

    failures.sort_by_key(|(index, _)| *index);
    Err(HedgeError::AllProvidersFailed(
        failures.into_iter().map(|(_, failure)| failure).collect(),
    ))
}

async fn attempt<T: JsonContract>(
    gates: &ConcurrencyGateRegistry,
    provider: &dyn ModelProvider,
    system: &str,
    user: &str,
) -> Result<T, AttemptError> {
    let raw = gates.call_json(provider, system, user, T::NAME).await?;
    let data: T = serde_json::from_str(extract_first_json(&raw))?;
    data.validate()?;
    Ok(data)
}

/// Locate the JSON object in a completion.
///
/// Accepts bare JSON, a fenced code block, or prose around a `{ ... }` span.
pub fn extract_first_json(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return trimmed;
    }
    if let Some(body) = FENCED_BLOCK.captures(trimmed).and_then(|c| c.get(1)) {
        return body.as_str().trim();
    }
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if end > start => &trimmed[start..=end],
        _ => trimmed,
    }
}
