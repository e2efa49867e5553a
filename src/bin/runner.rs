use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use learnflow_backend::domain::jobs::{JobKind, JobService, Runner, RunnerConfig};
use learnflow_backend::infrastructure::bootstrap::AppContext;
use learnflow_backend::infrastructure::config::Config;
use learnflow_backend::infrastructure::logging::init_logging;

const USAGE: &str = "usage: runner story|cover (or AGENT_KIND=story|cover runner)";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let kind = resolve_kind(std::env::args().nth(1), std::env::var("AGENT_KIND").ok())?;

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
    init_logging(&config, "learnflow_backend=debug,runner=debug");

    let runner_config = RunnerConfig {
        batch_size: config.agent_batch_size,
        loop_delay: Duration::from_millis(config.agent_loop_delay_ms),
    };

    let ctx = AppContext::build(config).await?;
    let runner = Runner::new(
        Arc::new(JobService::new(ctx.job_repo.clone())),
        ctx.story_repo.clone(),
        ctx.providers.clone(),
        ctx.gates.clone(),
        runner_config,
    );

    tokio::select! {
        _ = runner.run(kind) => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for shutdown signal")?;
            tracing::info!(kind = %kind, "Shutdown requested, stopping runner");
        }
    }

    Ok(())
}

/// The first argument wins over `AGENT_KIND`; having neither is an error
fn resolve_kind(arg: Option<String>, env_kind: Option<String>) -> anyhow::Result<JobKind> {
    let raw = arg
        .or(env_kind)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("missing job kind"))
        .context(USAGE)?;

    raw.parse::<JobKind>()
        .map_err(|e| anyhow::anyhow!(e))
        .context(USAGE)
}
