use moka::future::Cache;
use std::time::{Duration, Instant};

/// Per-slug regeneration window for the audio trigger
pub struct TriggerCooldown {
    window: Duration,
    started: Cache<String, Instant>,
}

impl TriggerCooldown {
    pub fn new(window: Duration) -> Self {
        let started = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(window)
            .build();

        Self { window, started }
    }

    /// Start the window for `slug`.
    ///
    /// Fails with the remaining wait in whole seconds when a window is already open.
    pub async fn try_acquire(&self, slug: &str) -> Result<(), u64> {
        let entry = self
            .started
            .entry(slug.to_string())
            .or_insert_with(async { Instant::now() })
            .await;

        if entry.is_fresh() {
            return Ok(());
        }

        let remaining = self.window.saturating_sub(entry.value().elapsed());
        let secs = remaining.as_millis().div_ceil(1000) as u64;
        Err(secs.max(1))
    }

    /// Close the window early, used when generation failed
    pub async fn release(&self, slug: &str) {
        self.started.invalidate(slug).await;
    }
}
