// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::{broadcast, watch};
use tower_http::cors::{Any, CorsLayer};

use crate::models::MetricsSnapshot;
use crate::processes::ProcessCensus;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) stats_tx: broadcast::Sender<MetricsSnapshot>,
    pub(crate) latest_rx: watch::Receiver<Option<MetricsSnapshot>>,
    pub(crate) census: Arc<ProcessCensus>,
    pub(crate) ws_connections: Arc<AtomicUsize>,
}

pub fn app(
    stats_tx: broadcast::Sender<MetricsSnapshot>,
    latest_rx: watch::Receiver<Option<MetricsSnapshot>>,
    census: Arc<ProcessCensus>,
    ws_connections: Arc<AtomicUsize>,
) -> Router {
    let state = AppState {
        stats_tx,
        latest_rx,
        census,
        ws_connections,
    };
    Router::new()
        .route("/", get(|| async { "TaskScope is running" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/metrics", get(http::metrics_handler)) // GET /api/metrics
        .route("/api/memory-pressure", get(http::memory_pressure_handler)) // GET /api/memory-pressure
        .route("/api/processes", get(http::processes_handler)) // GET /api/processes
        .route(
            "/api/processes/{pid}/terminate",
            post(http::terminate_handler),
        ) // POST /api/processes/{pid}/terminate
        .route("/ws/metrics", get(ws::ws_metrics)) // WS /ws/metrics
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
