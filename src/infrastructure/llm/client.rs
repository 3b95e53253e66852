//! # Backend Client
//!
//! Provides the `Client` struct, the configured entry point for generation calls.
//! It routes requests to the provider named in the backend configuration.

use async_trait::async_trait;

use crate::domain::config::BackendConfig;
use crate::domain::error::BackendError;
use crate::domain::traits::PlanBackend;
use crate::infrastructure::llm::providers::{self, ProviderConfig};
use crate::infrastructure::llm::{Context, Provider, Response};

/// HTTP client bound to one provider
pub struct Client {
    http: reqwest::Client,
    provider: Provider,
    provider_config: ProviderConfig,
    temperature: Option<f32>,
}

impl Client {
    /// Create a new client from backend configuration
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let provider = Provider::from_str(&config.provider)
            .ok_or_else(|| BackendError::Config(format!("Unknown provider {}", config.provider)))?;
        let provider_config = ProviderConfig::from_backend_config(config)?;

        let http = reqwest::Client::builder()
            .timeout(provider_config.timeout)
            .build()
            .map_err(|e| BackendError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            provider,
            provider_config,
            temperature: config.temperature,
        })
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.provider_config.default_model
    }

    pub fn endpoint(&self) -> &str {
        &self.provider_config.base_url
    }

    /// Send a chat request with full context
    pub async fn chat(&self, context: Context) -> Result<Response, BackendError> {
        providers::chat(&self.http, self.provider, &self.provider_config, context).await
    }
}

#[async_trait]
impl PlanBackend for Client {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, BackendError> {
        let context = Context::new()
            .with_temperature(self.temperature)
            .add_system_message(system_prompt)
            .add_user_message(user_prompt);

        let response = self.chat(context).await?;
        tracing::debug!(
            "{} ({}) returned {} bytes",
            self.provider.as_str(),
            response.model,
            response.content.len()
        );
        Ok(response.content)
    }

    fn name(&self) -> &str {
        self.provider.as_str()
    }
}
