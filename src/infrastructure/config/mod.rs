use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Storage
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub run_migrations: bool,
    pub supabase_url: Option<String>,
    pub supabase_service_role_key: Option<String>,
    pub audio_bucket: String,
    pub audio_dest_dir: String,
    // LLM providers
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_temperature: f32,
    pub openai_max_concurrency: i32,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub anthropic_max_tokens: u32,
    pub anthropic_max_concurrency: i32,
    pub llm_call_timeout_secs: u64,
    // TTS providers
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_voice_id: Option<String>,
    pub elevenlabs_model_id: String,
    pub elevenlabs_base_url: String,
    pub google_tts_host: String,
    pub google_tts_lang: String,
    pub tts_cooldown_secs: u64,
    // Runner
    pub agent_batch_size: i64,
    pub agent_loop_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: Environment::Development,
            log_format: LogFormat::Pretty,
            storage_backend: StorageBackend::Memory,
            database_url: None,
            run_migrations: false,
            supabase_url: None,
            supabase_service_role_key: None,
            audio_bucket: "audio-files".to_string(),
            audio_dest_dir: "listening".to_string(),
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            openai_temperature: 0.7,
            openai_max_concurrency: 4,
            anthropic_api_key: None,
            anthropic_model: "claude-3-5-sonnet-20240620".to_string(),
            anthropic_max_tokens: 4096,
            anthropic_max_concurrency: 4,
            llm_call_timeout_secs: 120,
            elevenlabs_api_key: None,
            elevenlabs_voice_id: None,
            elevenlabs_model_id: "eleven_monolingual_v1".to_string(),
            elevenlabs_base_url: "https://api.elevenlabs.io".to_string(),
            google_tts_host: "https://translate.google.com".to_string(),
            google_tts_lang: "en".to_string(),
            tts_cooldown_secs: 60,
            agent_batch_size: 4,
            agent_loop_delay_ms: 1000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();
        let defaults = Config::default();

        let storage_backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => StorageBackend::Memory,
            _ => StorageBackend::Postgres,
        };
        let database_url = optional("DATABASE_URL");
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err("DATABASE_URL must be set when STORAGE_BACKEND=postgres".into());
        }

        let config = Config {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: match env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .as_str()
            {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            storage_backend,
            database_url,
            run_migrations: flag("RUN_MIGRATIONS"),
            supabase_url: optional("SUPABASE_URL")
                .or_else(|| optional("NEXT_PUBLIC_SUPABASE_URL")),
            supabase_service_role_key: optional("SUPABASE_SERVICE_ROLE_KEY"),
            audio_bucket: env::var("AUDIO_BUCKET").unwrap_or(defaults.audio_bucket),
            audio_dest_dir: env::var("AUDIO_DEST_DIR").unwrap_or(defaults.audio_dest_dir),
            openai_api_key: optional("OPENAI_API_KEY"),
            openai_model: env::var("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_temperature: env::var("OPENAI_TEMPERATURE")
                .unwrap_or_else(|_| "0.7".to_string())
                .parse()?,
            openai_max_concurrency: env::var("OPENAI_MAX_CONCURRENCY")
                .unwrap_or_else(|_| "4".to_string())
                .parse()?,
            anthropic_api_key: optional("ANTHROPIC_API_KEY"),
            anthropic_model: env::var("ANTHROPIC_MODEL").unwrap_or(defaults.anthropic_model),
            anthropic_max_tokens: env::var("ANTHROPIC_MAX_TOKENS")
                .unwrap_or_else(|_| "4096".to_string())
                .parse()?,
            anthropic_max_concurrency: env::var("ANTHROPIC_MAX_CONCURRENCY")
                .unwrap_or_else(|_| "4".to_string())
                .parse()?,
            llm_call_timeout_secs: env::var("LLM_CALL_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse()?,
            elevenlabs_api_key: optional("ELEVENLABS_API_KEY"),
            elevenlabs_voice_id: optional("ELEVENLABS_VOICE_ID"),
            elevenlabs_model_id: env::var("ELEVENLABS_MODEL_ID")
                .unwrap_or(defaults.elevenlabs_model_id),
            elevenlabs_base_url: env::var("ELEVENLABS_BASE_URL")
                .unwrap_or(defaults.elevenlabs_base_url),
            google_tts_host: env::var("GOOGLE_TTS_HOST").unwrap_or(defaults.google_tts_host),
            google_tts_lang: env::var("GOOGLE_TTS_LANG").unwrap_or(defaults.google_tts_lang),
            tts_cooldown_secs: env::var("TTS_COOLDOWN_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()?,
            agent_batch_size: env::var("AGENT_BATCH_SIZE")
                .unwrap_or_else(|_| "4".to_string())
                .parse()?,
            agent_loop_delay_ms: env::var("AGENT_LOOP_DELAY_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()?,
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Premium voice synthesis is only attempted when both key and voice are present
    pub fn elevenlabs_configured(&self) -> bool {
        self.elevenlabs_api_key.is_some() && self.elevenlabs_voice_id.is_some()
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn flag(key: &str) -> bool {
    env::var(key)
        .map(|value| value.to_lowercase() == "true")
        .unwrap_or(false)
}
