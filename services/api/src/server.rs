use crate::cli::ServeArgs;
use crate::infra::{load_snapshot, AppState};
use crate::routes::router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use home_ranker::config::AppConfig;
use home_ranker::error::AppError;
use home_ranker::telemetry::{self, LogOutput};
use std::sync::atomic::Ordering;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(snapshot) = args.snapshot.take() {
        config.listings.snapshot_path = snapshot;
    }

    telemetry::init(&config.telemetry, LogOutput::Stdout)?;

    let snapshot = load_snapshot(&config.listings)?;
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let app_state = AppState::new(prometheus_handle, snapshot);
    let readiness_flag = app_state.readiness.clone();

    let app = router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "listing ranker ready");

    axum::serve(listener, app).await?;
    Ok(())
}
