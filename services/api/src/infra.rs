use home_ranker::config::ListingsConfig;
use home_ranker::error::AppError;
use home_ranker::listings::{Snapshot, SnapshotLoader};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) snapshot: Arc<Snapshot>,
}

impl AppState {
    pub(crate) fn new(metrics: PrometheusHandle, snapshot: Snapshot) -> Self {
        Self {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(metrics),
            snapshot: Arc::new(snapshot),
        }
    }
}

pub(crate) fn load_snapshot(config: &ListingsConfig) -> Result<Snapshot, AppError> {
    let snapshot = SnapshotLoader::from_config(config).load_path(&config.snapshot_path)?;
    Ok(snapshot)
}
