//! OpenAI-compatible API provider
//!
//! Supports OpenAI and any server exposing `/chat/completions` (LM Studio, vLLM, llama.cpp).

use serde::{Deserialize, Serialize};

use super::{ProviderConfig, status_error, transport_error};
use crate::domain::error::BackendError;
use crate::infrastructure::llm::{Context, Response};

/// OpenAI API request format
#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

/// OpenAI API response format
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    model: String,
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Execute a chat request using OpenAI-compatible API
pub async fn chat(
    http: &reqwest::Client,
    config: &ProviderConfig,
    context: Context,
) -> Result<Response, BackendError> {
    let url = format!("{}/chat/completions", config.base_url);

    let request = OpenAIRequest {
        model: config.default_model.clone(),
        messages: context
            .messages
            .into_iter()
            .map(|msg| OpenAIMessage {
                role: msg.role.as_str().to_string(),
                content: msg.content,
            })
            .collect(),
        temperature: context.temperature,
    };

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
    parse_response(&body)
}

fn parse_response(body: &str) -> Result<Response, BackendError> {
    let openai_response: OpenAIResponse = serde_json::from_str(body)
        .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    let content = openai_response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| BackendError::InvalidResponse("No choices in response".to_string()))?;

    Ok(Response {
        content,
        model: openai_response.model,
    })
}
