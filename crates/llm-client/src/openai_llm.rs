//! OpenAI-backed [`LlmClient`]: wraps openai-client and sends messages exactly as given.

use anyhow::Result;
use async_trait::async_trait;
use prompt::ChatMessage;
use tracing::instrument;

use super::{chat_message_to_openai, LlmClient};
use crate::config::{LlmConfig, DEFAULT_MODEL, DEFAULT_TEMPERATURE};

/// [`LlmClient`] on top of `openai_client::OpenAIClient`.
#[derive(Clone)]
pub struct OpenAILlmClient {
    client: openai_client::OpenAIClient,
    model: String,
    temperature: Option<f32>,
}

impl OpenAILlmClient {
    pub fn new(api_key: String) -> Self {
        Self::with_client(openai_client::OpenAIClient::new(api_key))
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self::with_client(openai_client::OpenAIClient::with_base_url(api_key, base_url))
    }

    fn with_client(client: openai_client::OpenAIClient) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
            temperature: Some(DEFAULT_TEMPERATURE),
        }
    }

    /// Builds a client from config: key, base URL, model and temperature.
    /// The configured system prompt is added by the caller when it builds the messages.
    pub fn from_config(config: &dyn LlmConfig) -> Self {
        Self::with_base_url(config.api_key().to_string(), config.base_url().to_string())
            .with_model(config.model().to_string())
            .with_temperature(Some(config.temperature()))
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// `None` leaves the temperature to the API default.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, messages), fields(model = %self.model))]
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let openai_messages = messages
            .iter()
            .map(chat_message_to_openai)
            .collect::<Result<Vec<_>>>()?;
        self.client
            .chat_completion(&self.model, openai_messages, self.temperature)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_builders() {
        let client = OpenAILlmClient::new("sk-test".to_string());
        assert_eq!(client.model(), DEFAULT_MODEL);
        assert_eq!(client.temperature(), Some(DEFAULT_TEMPERATURE));

        let client = client
            .with_model("gpt-4o".to_string())
            .with_temperature(None);
        assert_eq!(client.model(), "gpt-4o");
        assert_eq!(client.temperature(), None);
    }

    #[test]
    fn test_message_conversion() {
        for msg in [
            ChatMessage::system("s"),
            ChatMessage::user("u"),
            ChatMessage::assistant("a"),
        ] {
            assert!(chat_message_to_openai(&msg).is_ok());
        }
    }
}
