use learnflow_backend::domain::content::{CoverSpec, JsonContract, StoryDoc};
use learnflow_backend::domain::jobs::{JobKind, JobService, Runner, RunnerConfig};
use learnflow_backend::domain::llm::{ConcurrencyGateRegistry, ModelProvider, ProviderRegistry};
use learnflow_backend::domain::tts::TtsProviderName;
use learnflow_backend::infrastructure::bootstrap::AppContext;
use learnflow_backend::infrastructure::config::{Config, StorageBackend};
use learnflow_backend::infrastructure::http::build_router;
use learnflow_backend::infrastructure::repositories::{
    InMemoryBlobStorage, InMemoryEventRepository, InMemoryJobRepository,
    InMemoryStoryRepository, PgJobRepository, PgStoryRepository, TtsRepository,
};
use once_cell::sync::Lazy;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use test_context::AsyncTestContext;
use testcontainers::{clients::Cli, Container};
use testcontainers_modules::postgres::Postgres;
use tokio::net::TcpListener;

pub mod api_client;
pub mod assertions;
pub mod db_pool;
pub mod fixtures;
pub mod mocks;

use api_client::TestClient;
use db_pool::{DatabasePool, PooledDatabase};
use mocks::{MockModelProvider, MockTts};

pub const AUDIO_BASE_URL: &str = "https://cdn.test/audio";

/// Two vendors: one always overloaded, one answering every contract
pub fn mock_providers() -> ProviderRegistry {
    let providers: Vec<Arc<dyn ModelProvider>> = vec![
        Arc::new(MockModelProvider::new("anthropic")),
        Arc::new(
            MockModelProvider::new("openai")
                .reply(StoryDoc::NAME, fixtures::story_document("harbour-list"))
                .reply(CoverSpec::NAME, fixtures::cover_document()),
        ),
    ];

    ProviderRegistry::new()
        .register(JobKind::Story, providers.clone())
        .register(JobKind::Cover, providers)
}

fn runner_config() -> RunnerConfig {
    RunnerConfig {
        batch_size: 8,
        loop_delay: Duration::from_millis(10),
    }
}

async fn serve(ctx: &AppContext) -> TestClient {
    let app = build_router(ctx);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to get local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    TestClient::new(&format!("http://{}", addr))
}

/// Server on in-memory storage with scripted model and speech vendors
pub struct TestContext {
    pub client: TestClient,
    pub runner: Runner,
    pub stories: Arc<InMemoryStoryRepository>,
    pub jobs: Arc<InMemoryJobRepository>,
    pub blobs: Arc<InMemoryBlobStorage>,
    pub events: Arc<InMemoryEventRepository>,
    pub free_tts: Arc<MockTts>,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let config = Config {
                host: "127.0.0.1".to_string(),
                port: 0,
                storage_backend: StorageBackend::Memory,
                audio_dest_dir: "listening".to_string(),
                tts_cooldown_secs: 60,
                ..Config::default()
            };

            let stories = Arc::new(InMemoryStoryRepository::new());
            let jobs = Arc::new(InMemoryJobRepository::new());
            let blobs = Arc::new(InMemoryBlobStorage::new(AUDIO_BASE_URL));
            let events = Arc::new(InMemoryEventRepository::new());
            let free_tts = Arc::new(MockTts::new(TtsProviderName::Google));
            let premium: Arc<dyn TtsRepository> =
                Arc::new(MockTts::new(TtsProviderName::ElevenLabs).failing());
            let gates = Arc::new(ConcurrencyGateRegistry::new());

            let ctx = AppContext {
                config: Arc::new(config),
                pool: None,
                job_repo: jobs.clone(),
                story_repo: stories.clone(),
                event_repo: events.clone(),
                blob_storage: blobs.clone(),
                premium_tts: Some(premium),
                free_tts: free_tts.clone(),
                providers: mock_providers(),
                gates: gates.clone(),
            };

            let client = serve(&ctx).await;
            let runner = Runner::new(
                Arc::new(JobService::new(jobs.clone())),
                stories.clone(),
                mock_providers(),
                gates,
                runner_config(),
            );

            Self {
                client,
                runner,
                stories,
                jobs,
                blobs,
                events,
                free_tts,
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {}
    }
}

static DOCKER: Lazy<Cli> = Lazy::new(Cli::default);

static SHARED_CONTAINER: Lazy<SharedContainer> = Lazy::new(SharedContainer::new);

static DB_POOL: Lazy<DatabasePool> = Lazy::new(|| DatabasePool::new(SHARED_CONTAINER.port));

struct SharedContainer {
    _container: Container<'static, Postgres>,
    port: u16,
}

impl SharedContainer {
    fn new() -> Self {
        let container = DOCKER.run(Postgres::default());
        let port = container.get_host_port_ipv4(5432);

        println!("🐳 Started shared PostgreSQL container on port {}", port);

        Self {
            _container: container,
            port,
        }
    }
}

/// Same server backed by a migrated Postgres database (needs Docker)
pub struct PgTestContext {
    pub client: TestClient,
    pub pool: PgPool,
    pub runner: Runner,
    _db: PooledDatabase,
}

impl AsyncTestContext for PgTestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let pooled_db = DB_POOL
                .get_database()
                .await
                .expect("Failed to get database from pool");
            let pool = Arc::new(pooled_db.pool.clone());

            let config = Config {
                host: "127.0.0.1".to_string(),
                port: 0,
                storage_backend: StorageBackend::Postgres,
                database_url: Some(pooled_db.database_url.clone()),
                ..Config::default()
            };

            let job_repo = Arc::new(PgJobRepository::new(pool.clone()));
            let story_repo = Arc::new(PgStoryRepository::new(pool.clone()));
            let gates = Arc::new(ConcurrencyGateRegistry::new());

            let ctx = AppContext {
                config: Arc::new(config),
                pool: Some(pool.clone()),
                job_repo: job_repo.clone(),
                story_repo: story_repo.clone(),
                event_repo: Arc::new(InMemoryEventRepository::new()),
                blob_storage: Arc::new(InMemoryBlobStorage::new(AUDIO_BASE_URL)),
                premium_tts: None,
                free_tts: Arc::new(MockTts::new(TtsProviderName::Google)),
                providers: mock_providers(),
                gates: gates.clone(),
            };

            let client = serve(&ctx).await;
            let runner = Runner::new(
                Arc::new(JobService::new(job_repo)),
                story_repo,
                mock_providers(),
                gates,
                runner_config(),
            );

            Self {
                client,
                pool: pooled_db.pool.clone(),
                runner,
                _db: pooled_db,
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {}
    }
}
