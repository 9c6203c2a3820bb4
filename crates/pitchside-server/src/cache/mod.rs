//! Aggregate cache for Pitchside Server.
//!
//! One upstream aggregate document is held in memory for a short TTL and
//! feeds are projected out of it. A failed refresh falls back to the last
//! good snapshot.

pub mod aggregate_cache;
pub mod clock;

// Re-exports
pub use aggregate_cache::{AggregateCache, CacheConfig, CacheError, CacheStatus};
pub use clock::{Clock, TokioClock};
