use anyhow::{bail, Context};

use learnflow_backend::domain::content::{StoryCatalog, StoryRecord};
use learnflow_backend::domain::tts::{
    AudioServiceApi, GenerateStoryAudio, PreferredProvider, SkipReason, SplitMode,
};
use learnflow_backend::infrastructure::bootstrap::AppContext;
use learnflow_backend::infrastructure::config::Config;
use learnflow_backend::infrastructure::logging::init_logging;

const USAGE: &str = "usage: generate-audio <slug|all> [--force] [--split=whole|section] \
                     [--provider=google|eleven|elevenlabs|auto]";

#[derive(Debug, Clone, PartialEq)]
enum Target {
    All,
    Slug(String),
}

#[derive(Debug, Clone, PartialEq)]
struct CliOptions {
    target: Target,
    force: bool,
    split: SplitMode,
    provider: PreferredProvider,
}

#[derive(Debug, Default, PartialEq)]
struct BatchSummary {
    generated: usize,
    skipped: usize,
    failed: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let options = parse_args(std::env::args().skip(1))?;

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
    init_logging(&config, "learnflow_backend=info,generate_audio=info");

    let ctx = AppContext::build(config).await?;
    let stories = load_stories(&ctx.story_catalog(), &options.target).await?;

    tracing::info!(
        count = stories.len(),
        split = ?options.split,
        provider = %options.provider,
        force = options.force,
        "Generating story audio"
    );

    let audio_service = ctx.audio_service();
    let summary = generate_all(audio_service.as_ref(), stories, &options).await;

    tracing::info!(
        generated = summary.generated,
        skipped = summary.skipped,
        failed = summary.failed,
        "Story audio run finished"
    );

    Ok(())
}

/// Parse `<slug|all> [--force] [--split=..] [--provider=..]`; provider defaults to google
fn parse_args<I>(args: I) -> anyhow::Result<CliOptions>
where
    I: IntoIterator<Item = String>,
{
    let mut target = None;
    let mut force = false;
    let mut split = SplitMode::Whole;
    let mut provider = PreferredProvider::Google;

    for arg in args {
        if arg == "--force" {
            force = true;
        } else if let Some(value) = arg.strip_prefix("--split=") {
            split = value.parse().map_err(|e: String| anyhow::anyhow!(e)).context(USAGE)?;
        } else if let Some(value) = arg.strip_prefix("--provider=") {
            provider = value.parse().map_err(|e: String| anyhow::anyhow!(e)).context(USAGE)?;
        } else if arg.starts_with("--") {
            bail!("unknown flag '{arg}'\n{USAGE}");
        } else if target.is_none() {
            target = Some(if arg == "all" {
                Target::All
            } else {
                Target::Slug(arg)
            });
        } else {
            bail!("unexpected argument '{arg}'\n{USAGE}");
        }
    }

    let Some(target) = target else {
        bail!("missing target\n{USAGE}");
    };

    Ok(CliOptions {
        target,
        force,
        split,
        provider,
    })
}

async fn load_stories(
    catalog: &StoryCatalog,
    target: &Target,
) -> anyhow::Result<Vec<StoryRecord>> {
    let stories = match target {
        Target::All => catalog.list_for_audio().await?,
        Target::Slug(slug) => catalog.find_for_audio(slug).await?.into_iter().collect(),
    };

    if stories.is_empty() {
        let label = match target {
            Target::All => "all",
            Target::Slug(slug) => slug.as_str(),
        };
        bail!("no stories found for target \"{label}\"");
    }

    Ok(stories)
}

/// Generate audio story by story; one failure never stops the run
async fn generate_all(
    audio_service: &dyn AudioServiceApi,
    stories: Vec<StoryRecord>,
    options: &CliOptions,
) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for story in stories {
        let slug = story.slug.clone();
        let request = GenerateStoryAudio {
            story,
            split: options.split,
            provider: options.provider,
            force: options.force,
        };

        match audio_service.generate_story_audio(request).await {
            Ok(result) if result.skipped => match result.reason {
                Some(reason) => {
                    summary.skipped += 1;
                    tracing::info!(slug = %slug, reason = skip_label(reason), "Skipped");
                }
                None => {
                    summary.failed += 1;
                    let errors = result.errors.unwrap_or_default().join(", ");
                    tracing::error!(slug = %slug, errors = %errors, "Every section failed");
                }
            },
            Ok(result) => {
                summary.generated += 1;
                let errors = result.errors.unwrap_or_default();
                match options.split {
                    SplitMode::Section => tracing::info!(
                        slug = %slug,
                        clips = result.audio_parts.map_or(0, |parts| parts.len()),
                        errors = %errors.join(", "),
                        "Generated section clips"
                    ),
                    SplitMode::Whole => tracing::info!(
                        slug = %slug,
                        bytes = result.bytes.unwrap_or(0),
                        provider = ?result.provider,
                        url = result.audio_url.as_deref().unwrap_or_default(),
                        "Generated story audio"
                    ),
                }
            }
            Err(e) => {
                summary.failed += 1;
                tracing::error!(slug = %slug, error = %e, "Failed to generate audio");
            }
        }
    }

    summary
}

fn skip_label(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::AudioExists => "audio already exists",
        SkipReason::SectionsExist => "section audio already exists",
        SkipReason::NoSections => "no sections to synthesize",
    }
}
