//! # Domain Traits
//!
//! Abstract interface for the text-generation backend.
//! Allows for pluggable implementations in the Infrastructure layer.

use async_trait::async_trait;

use crate::domain::error::BackendError;

/// A text-generation capability that answers one system + user prompt pair.
///
/// The returned text is untrusted: it is expected, but not guaranteed, to
/// contain one JSON plan object.
#[async_trait]
pub trait PlanBackend: Send + Sync {
    async fn generate(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, BackendError>;

    /// Backend label used in logs.
    fn name(&self) -> &str;
}
