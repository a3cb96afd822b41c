//! Chat completion client for the assistant using an OpenAI-compatible API

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use tracing::{debug, error, info};

use crate::config::{build_user_prompt, ApiKey, SYSTEM_PROMPT};
use crate::error::{AssistError, Result};
use crate::view::Snapshot;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Configuration for the completion endpoint
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub base_url: String,
    pub api_key: ApiKey,
    pub model_name: String,
    pub system_prompt: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: ApiKey::default(),
            model_name: DEFAULT_MODEL.to_string(),
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }
}

impl ModelConfig {
    /// Create a new ModelConfig with custom settings
    pub fn new(base_url: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model_name: model_name.into(),
            ..Default::default()
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<ApiKey>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the model name
    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Replace the system instruction
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }
}

/// Something that can answer a question about a snapshot.
///
/// Returns the trimmed reply, or `None` when no usable reply was obtained.
/// Implementations log their own failures.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str, snapshot: &Snapshot) -> Option<String>;
}

/// Client for the chat completion endpoint
pub struct AssistantClient {
    config: ModelConfig,
    client: Client<OpenAIConfig>,
}

impl AssistantClient {
    /// Create a new AssistantClient
    ///
    /// Rate-limit retries in the transport are disabled: a 429 fails the call
    /// like any other error status.
    pub fn new(config: ModelConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(&config.base_url)
            .with_api_key(config.api_key.as_str());

        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        let client = Client::with_config(openai_config).with_backoff(no_retry);

        Self { config, client }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Test connection to the model API by sending a tiny request
    pub async fn check_connection(&self) -> Result<()> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model_name)
            .max_tokens(5_u32)
            .messages(vec![MessageBuilder::create_user_message("Hi")?])
            .build()?;

        let response = self.client.chat().create(request).await?;

        if response.choices.is_empty() {
            return Err(AssistError::EmptyResponse);
        }

        Ok(())
    }

    /// Build the two-message request for `prompt` about `snapshot`
    pub fn build_request(
        &self,
        prompt: &str,
        snapshot: &Snapshot,
    ) -> Result<CreateChatCompletionRequest> {
        let snapshot_json = snapshot.to_pretty_json()?;

        let messages = vec![
            MessageBuilder::create_system_message(&self.config.system_prompt)?,
            MessageBuilder::create_user_message(&build_user_prompt(prompt, &snapshot_json))?,
        ];

        Ok(CreateChatCompletionRequestArgs::default()
            .model(&self.config.model_name)
            .messages(messages)
            .build()?)
    }

    /// Send one request and return the trimmed text of the first choice
    pub async fn request(&self, prompt: &str, snapshot: &Snapshot) -> Result<String> {
        let request = self.build_request(prompt, snapshot)?;
        debug!(
            "Sending completion request to {} (model {})",
            self.config.base_url, self.config.model_name
        );

        let response = self.client.chat().create(request).await?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref());

        trimmed_reply(content)
    }
}

#[async_trait]
impl CompletionBackend for AssistantClient {
    async fn complete(&self, prompt: &str, snapshot: &Snapshot) -> Option<String> {
        match self.request(prompt, snapshot).await {
            Ok(reply) => {
                info!("Assistant response: {}", reply);
                Some(reply)
            }
            Err(e) => {
                error!("Failed to get assistant response: {}", e);
                None
            }
        }
    }
}

/// Trim a reply, treating a missing or blank one as empty
pub fn trimmed_reply(content: Option<&str>) -> Result<String> {
    match content.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(AssistError::EmptyResponse),
    }
}

/// Helper for building conversation messages
pub struct MessageBuilder;

impl MessageBuilder {
    /// Create a system message
    pub fn create_system_message(content: &str) -> Result<ChatCompletionRequestMessage> {
        Ok(ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into())
    }

    /// Create a plain-text user message
    pub fn create_user_message(text: &str) -> Result<ChatCompletionRequestMessage> {
        Ok(ChatCompletionRequestUserMessageArgs::default()
            .content(text)
            .build()?
            .into())
    }
}
