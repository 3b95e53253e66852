//! # Log Messages
//!
//! Format helpers for the operational log lines written at startup and per request.

pub fn config_loaded(path: &str) -> String {
    format!("Loaded configuration from {path}")
}

pub fn backend_ready(provider: &str, model: &str, endpoint: &str) -> String {
    format!("Generation backend: {provider} model={model} endpoint={endpoint}")
}

pub fn server_listening(addr: &str) -> String {
    format!("Planner listening on http://{addr}")
}

pub const SHUTDOWN: &str = "Shutting down...";

pub fn shutdown_fail(err: &str) -> String {
    format!("Unable to listen for shutdown signal: {err}")
}

pub fn plan_ready(name: &str, actions: usize, source: &str) -> String {
    format!("Plan {name} ({actions} actions) from {source}")
}

pub fn backend_failed(backend: &str, err: &str) -> String {
    format!("Backend {backend} failed, returning NoOp: {err}")
}
