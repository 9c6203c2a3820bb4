//! Pitchside Server - HTTP front for a third-party cricket data API
//!
//! Serves four feeds (live matches, upcoming matches, series, news) out of a
//! short-TTL cache of one upstream aggregate document, falling back to the
//! last good copy when a refresh fails, and forwards every other configured
//! endpoint to the upstream with the access token injected.

pub mod cache;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod settings;
pub mod state;

pub use cache::{AggregateCache, CacheConfig, CacheError, CacheStatus, Clock, TokioClock};
pub use error::AppError;
pub use handlers::response::ErrorEnvelope;
pub use server::{create_router, create_router_with_state, run_server_with_state};
pub use settings::{Settings, SettingsError};
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
