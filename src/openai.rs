//! OpenAI-compatible client configuration.

use crate::config::LlmSettings;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create a client for the configured endpoint, key and timeout.
pub fn create_client(settings: &LlmSettings) -> Client<OpenAIConfig> {
    let mut config = OpenAIConfig::new();

    if let Ok(key) = std::env::var(&settings.api_key_env) {
        config = config.with_api_key(key);
    }
    if let Some(base) = settings.api_base.as_deref().filter(|b| !b.is_empty()) {
        config = config.with_api_base(base);
    }

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()
        .unwrap_or_default();

    Client::with_config(config).with_http_client(http_client)
}
