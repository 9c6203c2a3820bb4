//! Aggregate cache metrics recording.

use metrics::{counter, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Registra las metricas de cache.
/// Llamar una vez al inicio para registrar las metricas.
pub fn register_cache_metrics() {
    metrics::describe_counter!(
        "pitchside_cache_hits_total",
        "Aggregate requests served from a fresh snapshot"
    );
    metrics::describe_counter!(
        "pitchside_cache_misses_total",
        "Aggregate requests that triggered an upstream fetch"
    );
    metrics::describe_counter!(
        "pitchside_cache_fetch_failures_total",
        "Failed upstream fetches of the aggregate document"
    );
    metrics::describe_counter!(
        "pitchside_cache_stale_served_total",
        "Failed refreshes answered with a stale snapshot"
    );
    metrics::describe_histogram!(
        "pitchside_cache_refresh_seconds",
        "Time spent fetching the aggregate document"
    );
}

/// Recorder de metricas de cache.
/// Usa atomic counters internos ademas del recorder global.
#[derive(Debug, Clone)]
pub struct CacheMetrics {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    fetch_failures: Arc<AtomicU64>,
    stale_served: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self {
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            fetch_failures: Arc::new(AtomicU64::new(0)),
            stale_served: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Registra un cache hit
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("pitchside_cache_hits_total").increment(1);
    }

    /// Registra un cache miss
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("pitchside_cache_misses_total").increment(1);
    }

    pub fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
        counter!("pitchside_cache_fetch_failures_total").increment(1);
    }

    /// Registra una respuesta servida desde un snapshot vencido
    pub fn record_stale_served(&self) {
        self.stale_served.fetch_add(1, Ordering::Relaxed);
        counter!("pitchside_cache_stale_served_total").increment(1);
    }

    /// Registra la duracion de un fetch al upstream
    pub fn record_refresh_duration(&self, duration: Duration) {
        histogram!("pitchside_cache_refresh_seconds").record(duration.as_secs_f64());
    }

    /// Calcula hit rate (para logging/debugging)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let misses = self.misses() as f64;
        let total = hits + misses;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn fetch_failures(&self) -> u64 {
        self.fetch_failures.load(Ordering::Relaxed)
    }

    pub fn stale_served(&self) -> u64 {
        self.stale_served.load(Ordering::Relaxed)
    }
}

impl Default for CacheMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_metrics_hit_rate() {
        let metrics = CacheMetrics::new();
        assert_eq!(metrics.hit_rate(), 0.0);

        // 3 hits, 1 miss = 75% hit rate
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();

        assert!((metrics.hit_rate() - 0.75).abs() < 0.001);
    }

    #[test]
    fn test_failure_counters_are_independent() {
        let metrics = CacheMetrics::new();

        metrics.record_fetch_failure();
        metrics.record_fetch_failure();
        metrics.record_stale_served();

        assert_eq!(metrics.fetch_failures(), 2);
        assert_eq!(metrics.stale_served(), 1);
        assert_eq!(metrics.hits(), 0);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = CacheMetrics::new();
        let clone = metrics.clone();

        clone.record_miss();

        assert_eq!(metrics.misses(), 1);
    }
}
