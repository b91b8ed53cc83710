//! Chat backend settings loaded from the environment.

use crate::error::ChatError;

/// Default OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.cerebras.ai/v1";
pub const DEFAULT_MODEL: &str = "gpt-oss-120b";
pub const DEFAULT_TEMPERATURE: f32 = 0.6;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Environment variables consulted for the API key, in priority order.
pub const API_KEY_VARS: &[&str] = &["CEREBRAS_API_KEY", "VITE_CEREBRAS_API_KEY"];

/// Runtime configuration for the chat backend.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatConfig {
    /// Configuration with default endpoint and sampling settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ChatError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variable names; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ChatError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let load = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = API_KEY_VARS
            .iter()
            .find_map(|&key| load(key))
            .ok_or(ChatError::MissingApiKey)?;

        let mut config = Self::new(api_key);
        if let Some(url) = load("CEREBRAS_BASE_URL") {
            config = config.with_base_url(url);
        }
        if let Some(model) = load("CEREBRAS_MODEL") {
            config = config.with_model(model);
        }

        log::debug!("Chat backend {} using model {}", config.base_url, config.model);
        Ok(config)
    }
}
