//! Time source for the aggregate cache.

use tokio::time::Instant;

/// Supplies the current instant to the cache.
///
/// Injected so freshness decisions are deterministic under test.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Reads `tokio::time::Instant::now()`.
///
/// Under a paused tokio runtime (`start_paused = true`) this clock only moves
/// when the test calls `tokio::time::advance`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
