//! Metrics setup and initialization.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::info;

use super::{cache::register_cache_metrics, http::register_http_metrics};

/// Buckets para histogramas (en segundos). Upstream fetches dominate, so the
/// range runs from 1 ms to 10 s.
const LATENCY_BUCKETS: &[f64] = &[
    0.001, // 1 milisegundo
    0.005, // 5 milisegundos
    0.01,  // 10 milisegundos
    0.025, // 25 milisegundos
    0.05,  // 50 milisegundos
    0.1,   // 100 milisegundos
    0.25,  // 250 milisegundos
    0.5,   // 500 milisegundos
    1.0,   // 1 segundo
    2.5,   // 2.5 segundos
    5.0,   // 5 segundos
    10.0,  // 10 segundos
];

/// Instala el recorder global y retorna el handle para el endpoint.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets(LATENCY_BUCKETS)?
        .install_recorder()?;

    register_cache_metrics();
    register_http_metrics();

    info!("Metrics system initialized");
    Ok(handle)
}

/// Builds a handle without installing a global recorder.
///
/// Used by tests and tools that need a `/metrics` route but must not claim
/// the process-wide recorder.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}
