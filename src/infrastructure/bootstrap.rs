use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::domain::content::StoryCatalog;
use crate::domain::jobs::JobKind;
use crate::domain::llm::{ConcurrencyGateRegistry, ModelProvider, ProviderRegistry};
use crate::domain::tts::{AudioService, SpeechSynthesizer};
use crate::infrastructure::config::{Config, StorageBackend};
use crate::infrastructure::db::{check_connection, create_pool, run_migrations, DbPool};
use crate::infrastructure::llm::{AnthropicProvider, OpenAiProvider};
use crate::infrastructure::repositories::{
    BlobStorage, ElevenLabsTtsRepository, EventRepository, GoogleTtsRepository,
    InMemoryBlobStorage, InMemoryEventRepository, InMemoryJobRepository,
    InMemoryStoryRepository, JobRepository, PgEventRepository, PgJobRepository,
    PgStoryRepository, StoryRepository, SupabaseBlobStorage, TtsRepository,
};

/// Everything the binaries need, wired from configuration
pub struct AppContext {
    pub config: Arc<Config>,
    pub pool: Option<Arc<DbPool>>,
    pub job_repo: Arc<dyn JobRepository>,
    pub story_repo: Arc<dyn StoryRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub blob_storage: Arc<dyn BlobStorage>,
    pub premium_tts: Option<Arc<dyn TtsRepository>>,
    pub free_tts: Arc<dyn TtsRepository>,
    pub providers: ProviderRegistry,
    pub gates: Arc<ConcurrencyGateRegistry>,
}

impl AppContext {
    pub async fn build(config: Config) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        let (pool, job_repo, story_repo, event_repo) = match config.storage_backend {
            StorageBackend::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL is required for the postgres backend")?;
                let pool = create_pool(database_url)
                    .await
                    .context("failed to create database pool")?;
                tracing::info!("Database connection pool created");

                check_connection(&pool)
                    .await
                    .context("database connection check failed")?;
                tracing::info!("Database connection verified");

                if config.run_migrations {
                    run_migrations(&pool).await.context("failed to run migrations")?;
                    tracing::info!("Database migrations applied");
                }

                let pool = Arc::new(pool);
                let job_repo: Arc<dyn JobRepository> = Arc::new(PgJobRepository::new(pool.clone()));
                let story_repo: Arc<dyn StoryRepository> =
                    Arc::new(PgStoryRepository::new(pool.clone()));
                let event_repo: Arc<dyn EventRepository> =
                    Arc::new(PgEventRepository::new(pool.clone()));
                (Some(pool), job_repo, story_repo, event_repo)
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                let job_repo: Arc<dyn JobRepository> = Arc::new(InMemoryJobRepository::new());
                let story_repo: Arc<dyn StoryRepository> = Arc::new(InMemoryStoryRepository::new());
                let event_repo: Arc<dyn EventRepository> = Arc::new(InMemoryEventRepository::new());
                (None, job_repo, story_repo, event_repo)
            }
        };

        let gates = Arc::new(
            ConcurrencyGateRegistry::new()
                .with_call_timeout(Duration::from_secs(config.llm_call_timeout_secs)),
        );

        Ok(Self {
            blob_storage: blob_storage(&config),
            premium_tts: premium_tts(&config),
            free_tts: Arc::new(GoogleTtsRepository::new(
                config.google_tts_host.clone(),
                config.google_tts_lang.clone(),
            )),
            providers: model_providers(&config),
            gates,
            pool,
            job_repo,
            story_repo,
            event_repo,
            config,
        })
    }

    /// Audio pipeline over the configured speech vendors and blob storage
    pub fn audio_service(&self) -> Arc<AudioService> {
        let synthesizer = Arc::new(SpeechSynthesizer::new(
            self.premium_tts.clone(),
            self.free_tts.clone(),
            self.blob_storage.clone(),
        ));
        Arc::new(AudioService::new(
            self.story_repo.clone(),
            synthesizer,
            self.config.audio_dest_dir.clone(),
        ))
    }

    pub fn story_catalog(&self) -> StoryCatalog {
        StoryCatalog::new(self.story_repo.clone())
    }
}

fn blob_storage(config: &Config) -> Arc<dyn BlobStorage> {
    match (&config.supabase_url, &config.supabase_service_role_key) {
        (Some(url), Some(key)) => Arc::new(SupabaseBlobStorage::new(
            url.clone(),
            key.clone(),
            config.audio_bucket.clone(),
        )),
        _ => {
            tracing::warn!("Supabase storage not configured, audio is kept in memory");
            Arc::new(InMemoryBlobStorage::new(format!(
                "memory://{}",
                config.audio_bucket
            )))
        }
    }
}

fn premium_tts(config: &Config) -> Option<Arc<dyn TtsRepository>> {
    match (&config.elevenlabs_api_key, &config.elevenlabs_voice_id) {
        (Some(key), Some(voice)) => Some(Arc::new(ElevenLabsTtsRepository::new(
            key.clone(),
            voice.clone(),
            config.elevenlabs_model_id.clone(),
            config.elevenlabs_base_url.clone(),
        ))),
        _ => None,
    }
}

/// Both job kinds hedge across every configured vendor
fn model_providers(config: &Config) -> ProviderRegistry {
    let mut providers: Vec<Arc<dyn ModelProvider>> = Vec::new();

    if let Some(key) = &config.openai_api_key {
        providers.push(Arc::new(OpenAiProvider::new(
            key,
            config.openai_model.clone(),
            config.openai_temperature,
            config.openai_max_concurrency,
        )));
    }
    if let Some(key) = &config.anthropic_api_key {
        providers.push(Arc::new(AnthropicProvider::new(
            key.clone(),
            config.anthropic_model.clone(),
            config.anthropic_max_tokens,
            config.anthropic_max_concurrency,
        )));
    }

    if providers.is_empty() {
        tracing::warn!("No model providers configured; generation jobs will fail");
    }

    ProviderRegistry::new()
        .register(JobKind::Story, providers.clone())
        .register(JobKind::Cover, providers)
}
