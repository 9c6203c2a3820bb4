//! Pitchside Server binary.

use std::sync::Arc;

use anyhow::Context;
use pitchside_server::{AppState, Settings, metrics::init_metrics, run_server_with_state};
use pitchside_upstream::HttpUpstream;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load().context("failed to load settings")?;
    let addr = settings.socket_addr()?;
    let endpoints = settings.endpoint_table()?;

    tracing::info!(
        "Starting Pitchside Server v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Upstream: {}", settings.upstream.base_url());
    tracing::info!("Endpoints: {}", endpoints.len());

    let upstream = HttpUpstream::new(settings.upstream.clone())
        .context("failed to build upstream client")?;
    let state = AppState::new(Arc::new(upstream), settings.cache_config());
    tracing::info!("Aggregate TTL: {}s", state.cache().ttl().as_secs());

    let prometheus = init_metrics().context("failed to install metrics recorder")?;

    run_server_with_state(addr, state, &endpoints, prometheus).await?;

    Ok(())
}
