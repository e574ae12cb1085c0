use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;
use workway::applicants::{ApplicantService, FileAttachmentStore, MemoryCollection};
use workway::config::AppConfig;
use workway::error::AppError;
use workway::telemetry;

use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::service_routes;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(upload_dir) = args.upload_dir.take() {
        config.storage.upload_dir = upload_dir;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        upload_dir: Arc::new(config.storage.upload_dir.clone()),
    };

    let collection = Arc::new(MemoryCollection::default());
    let attachments = Arc::new(FileAttachmentStore::open(&config.storage.upload_dir)?);
    let service = Arc::new(ApplicantService::new(collection, attachments));

    let app = service_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, upload_dir = %config.storage.upload_dir.display(), "applicant registry ready");

    axum::serve(listener, app).await?;
    Ok(())
}
