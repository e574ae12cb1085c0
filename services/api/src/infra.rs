use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    /// Directory attachment references resolve against; owned by the
    /// attachment store, read-only here.
    pub(crate) upload_dir: Arc<PathBuf>,
}
