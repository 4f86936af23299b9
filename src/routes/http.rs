// GET/POST handlers: version, metrics, memory pressure, processes

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::AppState;
use crate::error::ActionError;
use crate::models::MemoryPressure;

/// Package name and version (from Cargo.toml).
const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn error_body(status: StatusCode, message: impl std::fmt::Display) -> Response {
    (
        status,
        Json(serde_json::json!({ "error": message.to_string() })),
    )
        .into_response()
}

/// GET /version: returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/metrics: latest snapshot taken by the worker; 503 until the first one.
pub(super) async fn metrics_handler(State(state): State<AppState>) -> Response {
    let latest = state.latest_rx.borrow().clone();
    match latest {
        Some(snapshot) => Json(snapshot).into_response(),
        None => error_body(StatusCode::SERVICE_UNAVAILABLE, "no snapshot taken yet"),
    }
}

/// GET /api/memory-pressure: coarse label from the latest snapshot's memory.
pub(super) async fn memory_pressure_handler(State(state): State<AppState>) -> impl IntoResponse {
    let pressure = (*state.latest_rx.borrow())
        .as_ref()
        .map(|s| s.memory.pressure())
        .unwrap_or(MemoryPressure::Unknown);
    Json(serde_json::json!({ "pressure": pressure }))
}

/// GET /api/processes: process census, busiest first.
pub(super) async fn processes_handler(State(state): State<AppState>) -> Response {
    let census = state.census.clone();
    match tokio::task::spawn_blocking(move || census.list_processes()).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, operation = "list_processes", "census task failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

/// POST /api/processes/{pid}/terminate: 204 on success.
pub(super) async fn terminate_handler(
    State(state): State<AppState>,
    Path(pid): Path<u32>,
) -> Response {
    let census = state.census.clone();
    match tokio::task::spawn_blocking(move || census.terminate(pid)).await {
        Ok(Ok(())) => StatusCode::NO_CONTENT.into_response(),
        Ok(Err(e @ ActionError::ProcessNotFound(_))) => error_body(StatusCode::NOT_FOUND, e),
        Ok(Err(e @ ActionError::SignalFailed(_))) => {
            error_body(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
        Err(e) => {
            tracing::warn!(error = %e, operation = "terminate", "terminate task failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}
