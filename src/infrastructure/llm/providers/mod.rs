//! # Providers
//!
//! Wire implementations for each backend flavour:
//! - Ollama native chat API
//! - OpenAI-compatible API (OpenAI, LM Studio, vLLM, ...)

mod ollama;
mod openai;

use std::time::Duration;

use crate::domain::config::BackendConfig;
use crate::domain::error::BackendError;
use crate::infrastructure::llm::{Context, Provider, Response};

/// Configuration for a provider
#[derive(Clone)]
pub struct ProviderConfig {
    /// API key, when the server wants one
    pub api_key: Option<String>,
    /// Base URL without the route suffix
    pub base_url: String,
    /// Default model
    pub default_model: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn from_backend_config(config: &BackendConfig) -> Result<Self, BackendError> {
        let api_key = if let Some(key) = &config.api_key {
            Some(key.clone())
        } else if let Some(env_var) = &config.api_key_env {
            let key = std::env::var(env_var).map_err(|e| {
                BackendError::Config(format!("API key env var {} not set: {}", env_var, e))
            })?;
            Some(key)
        } else {
            None
        };

        Ok(Self {
            api_key,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            default_model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }
}

/// Execute a chat request with the specified provider
pub async fn chat(
    http: &reqwest::Client,
    provider: Provider,
    config: &ProviderConfig,
    context: Context,
) -> Result<Response, BackendError> {
    match provider {
        Provider::Ollama => ollama::chat(http, config, context).await,
        Provider::OpenAI => openai::chat(http, config, context).await,
    }
}

/// Map a reqwest failure onto the backend error taxonomy.
fn transport_error(e: reqwest::Error, timeout: Duration) -> BackendError {
    if e.is_timeout() {
        BackendError::TimedOut(timeout)
    } else {
        BackendError::Transport(e.to_string())
    }
}

/// Turn a non-success response into `BackendError::Status`, keeping any error message.
async fn status_error(response: reqwest::Response) -> BackendError {
    let status = response.status().as_u16();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());

    // Both servers report {"error": "..."} or {"error": {"message": "..."}}
    let body = serde_json::from_str::<serde_json::Value>(&error_text)
        .ok()
        .and_then(|json| {
            let error = json.get("error")?;
            error
                .as_str()
                .or_else(|| error.get("message").and_then(|m| m.as_str()))
                .map(str::to_string)
        })
        .unwrap_or(error_text);

    BackendError::Status { status, body }
}
