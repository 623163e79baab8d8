use async_openai::{
    config::OpenAIConfig, types::ChatCompletionRequestMessage,
    types::ChatCompletionRequestUserMessage, types::CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::time::Duration;

use crate::errors::{GenerationError, GenerationResult};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
/// Gemini speaks the OpenAI chat completions protocol at this address
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Where and how to reach the LLM. Without an API key the service runs offline.
#[derive(Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            api_base: DEFAULT_API_BASE.into(),
        }
    }
}

impl LlmConfig {
    /// Read the configuration from the process environment (and `.env`, if loaded).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    ///
    /// `LLM_*` names win over the `GEMINI_*` names; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| lookup(*key))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        };
        let defaults = Self::default();
        Self {
            api_key: first(&["LLM_API_KEY", "GEMINI_API_KEY"]),
            model: first(&["LLM_MODEL", "GEMINI_MODEL"]).unwrap_or(defaults.model),
            api_base: first(&["LLM_API_BASE"])
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
        }
    }
}

/// Anything that can turn a prompt into free text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send one prompt and return the raw completion text.
    async fn complete(&self, prompt: &str) -> GenerationResult<String>;

    fn model_name(&self) -> &str;
}

/// A provider for any OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct OpenAiProvider {
    client: async_openai::Client<OpenAIConfig>,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: &str, api_base: &str, model: &str) -> Self {
        // The client retries rate-limited calls on its own unless the backoff budget is zero.
        let no_retries = backoff::ExponentialBackoff {
            max_elapsed_time: Some(Duration::ZERO),
            ..Default::default()
        };
        let client = async_openai::Client::with_config(
            OpenAIConfig::new()
                .with_api_key(api_key)
                .with_api_base(api_base),
        )
        .with_backoff(no_retries);
        Self {
            client,
            model: model.to_string(),
        }
    }

    /// Build a provider, or nothing when no API key is configured.
    pub fn from_config(config: &LlmConfig) -> Option<Self> {
        config
            .api_key
            .as_deref()
            .map(|key| Self::new(key, &config.api_base, &config.model))
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    /// Calls the LLM one-shot API with a given prompt.
    async fn complete(&self, prompt: &str) -> GenerationResult<String> {
        let req_args = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages([ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessage {
                    content: prompt.into(),
                    name: None,
                },
            )])
            .build()?;
        let text = self
            .client
            .chat()
            .create(req_args)
            .await?
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerationError::Provider("No response from LLM".into()))?;
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
