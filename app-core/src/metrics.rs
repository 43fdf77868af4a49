use metrics_exporter_prometheus::PrometheusBuilder;
pub use metrics_exporter_prometheus::PrometheusHandle;

use crate::error::{CoreError, Result};

/// Installs the process-wide Prometheus recorder.
///
/// Only binaries call this. Without a recorder the `metrics` macros are
/// no-ops, which is what tests rely on.
pub fn install_recorder() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| CoreError::Metrics(e.to_string()))
}

/// Prometheus text for the `/metrics` route; empty when no recorder is installed.
pub fn render(handle: Option<&PrometheusHandle>) -> String {
    handle.map(PrometheusHandle::render).unwrap_or_default()
}
