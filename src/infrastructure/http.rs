//! # HTTP Surface
//!
//! `POST /plan` and `GET /health`. The plan route answers every request with a
//! well-formed plan; a body that cannot be read as a request gets the `NoOp` plan.

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    routing::{get, post},
};
use std::sync::Arc;
use tracing::Instrument;

use crate::application::orchestrator::Planner;
use crate::domain::types::{ActionPlan, PlanRequest};
use crate::strings::logs;

pub fn router(planner: Arc<Planner>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/plan", post(plan_handler))
        .with_state(planner)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(planner: Arc<Planner>, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    tracing::info!("{}", logs::server_listening(bind));

    axum::serve(listener, router(planner))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("{}", logs::SHUTDOWN);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("{}", logs::shutdown_fail(&e.to_string()));
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn plan_handler(State(planner): State<Arc<Planner>>, body: Bytes) -> Json<ActionPlan> {
    let request: PlanRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("Unreadable plan request ({} bytes): {}", body.len(), e);
            return Json(ActionPlan::noop());
        }
    };

    let span = tracing::info_span!(
        "plan",
        process = request.active_process_name.as_deref().unwrap_or("-"),
        intents = request.intents.len()
    );
    span.in_scope(|| tracing::debug!("Transcript: {:?}", request.transcript));

    Json(planner.plan(&request).instrument(span).await)
}
