use crate::domain::llm::{ModelProvider, ProviderCallError};
use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;

pub const PROVIDER_NAME: &str = "openai";

/// Chat completions in JSON-object mode
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_concurrent: i32,
}

impl OpenAiProvider {
    pub fn new(api_key: &str, model: String, temperature: f32, max_concurrent: i32) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Client::with_config(config),
            model,
            temperature,
            max_concurrent,
        }
    }
}

fn to_call_error(err: OpenAIError) -> ProviderCallError {
    match err {
        OpenAIError::ApiError(api) => match api_status(&api) {
            Some(status) => ProviderCallError::Http {
                provider: PROVIDER_NAME.to_string(),
                status,
                body: api.to_string(),
            },
            None => ProviderCallError::Transport(format!("{PROVIDER_NAME} api error: {api}")),
        },
        OpenAIError::Reqwest(e) => match e.status() {
            Some(status) => ProviderCallError::Http {
                provider: PROVIDER_NAME.to_string(),
                status: status.as_u16(),
                body: e.to_string(),
            },
            None => ProviderCallError::Transport(e.to_string()),
        },
        other => ProviderCallError::Transport(other.to_string()),
    }
}

/// The SDK keeps OpenAI's error object but not the response status, so map
/// the documented error codes and types back onto it
fn api_status(api: &ApiError) -> Option<u16> {
    let by_code = match api.code.as_deref() {
        Some("invalid_api_key") => Some(401),
        Some("model_not_found") => Some(404),
        Some("rate_limit_exceeded" | "insufficient_quota") => Some(429),
        _ => None,
    };

    by_code.or(match api.r#type.as_deref() {
        Some("invalid_request_error") => Some(400),
        Some("authentication_error") => Some(401),
        Some("permission_error") => Some(403),
        Some("not_found_error") => Some(404),
        Some("rate_limit_error" | "insufficient_quota" | "tokens") => Some(429),
        Some("server_error") => Some(500),
        _ => None,
    })
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn max_concurrent(&self) -> i32 {
        self.max_concurrent
    }

    async fn call_json(
        &self,
        system: &str,
        user: &str,
        schema_name: &str,
    ) -> Result<String, ProviderCallError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(self.temperature)
            .response_format(ResponseFormat::JsonObject)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()
                    .map_err(to_call_error)?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user)
                    .build()
                    .map_err(to_call_error)?
                    .into(),
            ])
            .build()
            .map_err(to_call_error)?;

        tracing::debug!(model = %self.model, schema = %schema_name, "Calling OpenAI");
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(to_call_error)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ProviderCallError::EmptyContent)
    }
}
