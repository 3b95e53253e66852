//! # Domain Errors
//!
//! Failure modes of a generation backend call. The orchestrator absorbs every
//! variant into a `NoOp` plan; they exist so callers and logs can tell them apart.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend call timed out after {0:?}")]
    TimedOut(std::time::Duration),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unreadable backend response: {0}")]
    InvalidResponse(String),
    #[error("backend misconfigured: {0}")]
    Config(String),
}

impl BackendError {
    /// Short label for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            BackendError::TimedOut(_) => "timeout",
            BackendError::Transport(_) => "transport",
            BackendError::Status { .. } => "status",
            BackendError::InvalidResponse(_) => "invalid_response",
            BackendError::Config(_) => "config",
        }
    }
}
