// Background sampling worker.
// Drives the sampler on a fixed interval and publishes every snapshot to the
// broadcast channel (/ws/metrics) and the latest-snapshot watch (/api/metrics).

use crate::models::MetricsSnapshot;
use crate::sampler::Sampler;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::{broadcast, watch};
use tokio::time::{Duration, Instant, interval};
use tracing::Instrument;

/// Rate limit for "no receivers" message (avoid logging every tick when no one is on /ws/metrics)
const NO_RECEIVERS_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Sampler, channels, counters and shutdown for the worker.
pub struct WorkerDeps {
    pub sampler: Arc<Sampler>,
    pub tx: broadcast::Sender<MetricsSnapshot>,
    pub latest_tx: watch::Sender<Option<MetricsSnapshot>>,
    pub ws_connections: Arc<AtomicUsize>,
    pub snapshots_taken_total: Arc<AtomicU64>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Worker timing and logging config.
pub struct WorkerConfig {
    pub sample_interval_ms: u64,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        sampler,
        tx,
        latest_tx,
        ws_connections,
        snapshots_taken_total,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        sample_interval_ms,
        stats_log_interval_secs,
    } = config;

    let stats_log_interval = Duration::from_secs(stats_log_interval_secs);

    let worker_span = tracing::span!(tracing::Level::DEBUG, "worker", sample_interval_ms);

    tokio::spawn(
        async move {
            let mut tick = interval(Duration::from_millis(sample_interval_ms));
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut stats_log_tick = interval(stats_log_interval);
            stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            let mut last_no_receivers_log: Option<Instant> = None;

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        let sampler = sampler.clone();
                        let snapshot = match tokio::task::spawn_blocking(move || sampler.sample()).await {
                            Ok(s) => s,
                            Err(e) => {
                                tracing::warn!(
                                    error = %e,
                                    operation = "sample",
                                    "sampling task failed"
                                );
                                continue;
                            }
                        };
                        snapshots_taken_total.fetch_add(1, Ordering::Relaxed);

                        latest_tx.send_replace(Some(snapshot.clone()));
                        if tx.send(snapshot).is_err() {
                            let should_log = last_no_receivers_log
                                .is_none_or(|t| t.elapsed() >= NO_RECEIVERS_LOG_INTERVAL);
                            if should_log {
                                tracing::debug!(
                                    operation = "broadcast_snapshot",
                                    "No active WebSocket clients; broadcast channel has no receivers"
                                );
                                last_no_receivers_log = Some(Instant::now());
                            }
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Worker shutting down");
                        break;
                    }
                    _ = stats_log_tick.tick() => {
                        tracing::info!(
                            ws_clients = ws_connections.load(Ordering::Relaxed),
                            snapshots_taken_total = snapshots_taken_total.load(Ordering::Relaxed),
                            "app stats"
                        );
                    }
                }
            }
        }
        .instrument(worker_span),
    )
}
