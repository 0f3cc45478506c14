//! LLM configuration: trait and env-based implementation.

use anyhow::{Context, Result};
use std::env;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// LLM configuration interface for OpenAI-compatible APIs.
pub trait LlmConfig: Send + Sync {
    fn api_key(&self) -> &str;
    fn base_url(&self) -> &str;
    fn model(&self) -> &str;
    fn temperature(&self) -> f32;
    fn system_prompt(&self) -> Option<&str>;
    fn assistant_name(&self) -> &str;
}

/// LLM config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvLlmConfig {
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_temperature: f32,
    pub llm_system_prompt: Option<String>,
    pub assistant_name: String,
}

impl LlmConfig for EnvLlmConfig {
    fn api_key(&self) -> &str {
        &self.llm_api_key
    }
    fn base_url(&self) -> &str {
        &self.llm_base_url
    }
    fn model(&self) -> &str {
        &self.llm_model
    }
    fn temperature(&self) -> f32 {
        self.llm_temperature
    }
    fn system_prompt(&self) -> Option<&str> {
        self.llm_system_prompt.as_deref()
    }
    fn assistant_name(&self) -> &str {
        &self.assistant_name
    }
}

impl EnvLlmConfig {
    /// Load from environment variables. `LLM_*` names win over their `OPENAI_*` fallbacks.
    pub fn from_env() -> Result<Self> {
        let llm_api_key = env::var("LLM_API_KEY")
            .or_else(|_| env::var("OPENAI_API_KEY"))
            .context("LLM_API_KEY or OPENAI_API_KEY not set")?;
        let llm_base_url = env::var("LLM_BASE_URL")
            .or_else(|_| env::var("OPENAI_BASE_URL"))
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let llm_model = env::var("MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let llm_temperature = match env::var("LLM_TEMPERATURE") {
            Ok(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse()
                .with_context(|| format!("LLM_TEMPERATURE has an invalid value: {}", raw))?,
            _ => DEFAULT_TEMPERATURE,
        };
        let llm_system_prompt = env::var("LLM_SYSTEM_PROMPT")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let assistant_name = env::var("ASSISTANT_NAME")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| prompt::DEFAULT_ASSISTANT_NAME.to_string());
        Ok(Self {
            llm_api_key,
            llm_base_url,
            llm_model,
            llm_temperature,
            llm_system_prompt,
            assistant_name,
        })
    }

    /// Validate config (key present, temperature within the API's 0..=2 range).
    pub fn validate(&self) -> Result<()> {
        if self.llm_api_key.trim().is_empty() {
            anyhow::bail!("LLM API key is empty");
        }
        if !(0.0..=2.0).contains(&self.llm_temperature) {
            anyhow::bail!(
                "LLM_TEMPERATURE must be between 0 and 2, got {}",
                self.llm_temperature
            );
        }
        Ok(())
    }
}
