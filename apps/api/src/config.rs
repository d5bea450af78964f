use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::interpretation::summarizer::DEFAULT_PREVIEW_CHARS;
use crate::llm_client::{ModelClientConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT};

/// Application configuration loaded from environment variables.
/// Every variable is optional; invalid values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub model_endpoint_url: String,
    pub model_name: String,
    pub model_timeout_secs: u64,
    pub history_preview_chars: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            model_endpoint_url: DEFAULT_ENDPOINT.to_string(),
            model_name: DEFAULT_MODEL.to_string(),
            model_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            history_preview_chars: DEFAULT_PREVIEW_CHARS,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            model_endpoint_url: std::env::var("MODEL_ENDPOINT_URL")
                .unwrap_or(defaults.model_endpoint_url),
            model_name: std::env::var("MODEL_NAME").unwrap_or(defaults.model_name),
            model_timeout_secs: parse_env("MODEL_TIMEOUT_SECS", defaults.model_timeout_secs)?,
            history_preview_chars: parse_env(
                "HISTORY_PREVIEW_CHARS",
                defaults.history_preview_chars,
            )?,
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }

    pub fn model_client_config(&self) -> ModelClientConfig {
        ModelClientConfig {
            endpoint: self.model_endpoint_url.clone(),
            model: self.model_name.clone(),
            timeout: Duration::from_secs(self.model_timeout_secs),
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
