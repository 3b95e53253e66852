//! Generation backend client
//!
//! A small wrapper over the chat endpoints of the supported servers:
//! - Ollama (`/api/chat`, non-streaming)
//! - OpenAI-compatible APIs (`/chat/completions`)
//!
//! [`Client`] implements [`PlanBackend`](crate::domain::traits::PlanBackend), so the
//! orchestrator never sees provider details.

mod client;
pub mod providers;
mod types;

pub use client::Client;

pub use types::{Context, Message, MessageRole, Provider, Response};
