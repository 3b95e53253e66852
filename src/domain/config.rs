//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! Every section has defaults, so an empty or absent file yields a working local setup
//! pointed at an Ollama instance on the default port.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub planner: PlannerSection,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load from a YAML file. A missing file is not an error; defaults apply.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.backend.timeout_secs == 0 {
            bail!("backend.timeout_secs must be at least 1");
        }
        Ok(())
    }
}

/// Which plan source the orchestrator consults.
#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum PlanningMode {
    /// Generation backend only.
    #[default]
    Llm,
    /// Rule-based planner first, backend when no rule matches.
    RuleBased,
    /// Rule-based planner only; nothing else is ever called.
    RulesOnly,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct PlannerSection {
    #[serde(default)]
    pub mode: PlanningMode,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    /// "ollama" or "openai" (any OpenAI-compatible server)
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_key_env: Option<String>, // e.g. "OPENAI_API_KEY"
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout(),
            api_key: None,
            api_key_env: None,
            temperature: None,
        }
    }
}

fn default_provider() -> String {
    "ollama".to_string()
}
fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}
fn default_model() -> String {
    "llama3.2".to_string()
}
fn default_timeout() -> u64 {
    20
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:5005".to_string()
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Optional log file, written alongside stdout.
    #[serde(default)]
    pub file: Option<String>,
    /// EnvFilter directives; `RUST_LOG` wins when set.
    #[serde(default)]
    pub filter: Option<String>,
}
