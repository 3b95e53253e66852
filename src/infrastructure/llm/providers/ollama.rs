//! Ollama native chat API
//!
//! `POST {base}/api/chat` with `stream: false`; the reply text is `message.content`.

use serde::{Deserialize, Serialize};

use super::{ProviderConfig, status_error, transport_error};
use crate::domain::error::BackendError;
use crate::infrastructure::llm::{Context, Response};

/// Ollama chat request format
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    stream: bool,
    messages: Vec<OllamaMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Ollama chat response format
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    model: String,
    message: OllamaMessage,
}

fn build_request(config: &ProviderConfig, context: Context) -> OllamaRequest {
    OllamaRequest {
        model: config.default_model.clone(),
        stream: false,
        messages: context
            .messages
            .into_iter()
            .map(|msg| OllamaMessage {
                role: msg.role.as_str().to_string(),
                content: msg.content,
            })
            .collect(),
        options: context.temperature.map(|temperature| OllamaOptions { temperature }),
    }
}

/// Execute a chat request against an Ollama server
pub async fn chat(
    http: &reqwest::Client,
    config: &ProviderConfig,
    context: Context,
) -> Result<Response, BackendError> {
    let url = format!("{}/api/chat", config.base_url);
    let request = build_request(config, context);

    let mut request_builder = http.post(&url).timeout(config.timeout).json(&request);
    if let Some(key) = &config.api_key {
        request_builder = request_builder.bearer_auth(key);
    }

    let response = request_builder
        .send()
        .await
        .map_err(|e| transport_error(e, config.timeout))?;

    if !response.status().is_success() {
        return Err(status_error(response).await);
    }

    let body = response
        .text()
        .await
        .map_err(|e| transport_error(e, config.timeout))?;
    let parsed: OllamaResponse = serde_json::from_str(&body)
        .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    Ok(Response {
        content: parsed.message.content,
        model: parsed.model,
    })
}
