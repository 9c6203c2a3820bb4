use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Extension, Router,
    http::Method,
    middleware,
    routing::get,
};
use metrics_exporter_prometheus::PrometheusHandle;
use pitchside_core::EndpointTable;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info};

use crate::handlers::{
    endpoint::dispatch,
    health::{health_check, not_found},
    metrics::metrics_handler,
};
use crate::middleware::{LoggingLayer, RequestIdLayer};
use crate::state::AppState;

/// Creates a router serving every endpoint of the table plus /health and /metrics.
pub fn create_router_with_state(
    state: AppState,
    endpoints: &EndpointTable,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(RequestIdLayer)
        .layer(LoggingLayer);

    // Router for metrics endpoint (different state)
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(prometheus_handle);

    let mut app_router = Router::new().route("/health", get(health_check));
    for endpoint in endpoints.iter() {
        debug!(endpoint = endpoint.name(), route = endpoint.route(), "registering route");
        app_router = app_router.route(
            endpoint.route(),
            get(dispatch).layer(Extension(Arc::new(endpoint.clone()))),
        );
    }
    let app_router = app_router.fallback(not_found).with_state(state);

    Router::new()
        .merge(app_router)
        .merge(metrics_router)
        .layer(middleware::from_fn(
            crate::metrics::http::http_metrics_middleware,
        ))
        .layer(cors())
        .layer(middleware_stack)
}

/// Creates a router without state (for testing only - health endpoint).
pub fn create_router() -> Router {
    let middleware = ServiceBuilder::new()
        .layer(RequestIdLayer)
        .layer(LoggingLayer);

    Router::new()
        .route("/health", get(health_check))
        .layer(middleware)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any)
}

/// Runs the server until Ctrl+C or SIGTERM.
pub async fn run_server_with_state(
    addr: SocketAddr,
    state: AppState,
    endpoints: &EndpointTable,
    prometheus_handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let app = create_router_with_state(state, endpoints, prometheus_handle);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
