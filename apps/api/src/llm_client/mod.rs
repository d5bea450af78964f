/// Model client — the single point of entry for calls to the generation endpoint.
///
/// ARCHITECTURAL RULE: No other module talks to the model endpoint directly.
/// All generation requests MUST go through `TextGenerator`.
///
/// One attempt per call: no retries, no caching. Transport failures (timeouts
/// included) and non-2xx statuses surface as distinct `ModelError` variants.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_MODEL: &str = "phi3:mini";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Could not reach model endpoint: {0}")]
    Connection(#[source] reqwest::Error),

    #[error("Model endpoint returned status {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ModelError {
    #[allow(dead_code)]
    pub fn is_timeout(&self) -> bool {
        matches!(self, ModelError::Connection(e) if e.is_timeout())
    }
}

/// Where and how to reach the model. Supplied at construction; never read from globals.
#[derive(Debug, Clone)]
pub struct ModelClientConfig {
    pub endpoint: String,
    pub model: String,
    /// Applied to every `generate` call unless the caller supplies its own.
    pub timeout: Duration,
}

impl Default for ModelClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    prompt_eval_count: Option<u64>,
    #[serde(default)]
    eval_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct EndpointError {
    error: String,
}

/// Seam between the orchestrator and whatever produces raw model text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the model's text payload exactly as received.
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

/// HTTP client for an Ollama-style `/api/generate` endpoint.
#[derive(Debug, Clone)]
pub struct ModelClient {
    client: Client,
    config: ModelClientConfig,
}

impl ModelClient {
    pub fn new(config: ModelClientConfig) -> Result<Self, ModelError> {
        let client = Client::builder().build().map_err(ModelError::Client)?;
        Ok(Self { client, config })
    }

    /// Sends one non-streamed generation request bounded by `timeout`.
    pub async fn generate_with_timeout(
        &self,
        prompt: &str,
        timeout: Duration,
    ) -> Result<String, ModelError> {
        let request_body = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .timeout(timeout)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                warn!("Model endpoint {} unreachable: {e}", self.config.endpoint);
                ModelError::Connection(e)
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<EndpointError>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            warn!("Model endpoint returned {status}: {message}");
            return Err(ModelError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(ModelError::Connection)?;
        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| ModelError::Upstream {
                status: status.as_u16(),
                message: format!("malformed generation body: {e}"),
            })?;

        debug!(
            "Generation succeeded: model={}, prompt_eval_count={:?}, eval_count={:?}",
            parsed.model.as_deref().unwrap_or(&self.config.model),
            parsed.prompt_eval_count,
            parsed.eval_count
        );

        Ok(parsed.response)
    }
}

#[async_trait]
impl TextGenerator for ModelClient {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        self.generate_with_timeout(prompt, self.config.timeout).await
    }
}
