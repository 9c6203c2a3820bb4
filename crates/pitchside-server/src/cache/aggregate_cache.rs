//! Short-TTL cache of the upstream aggregate document.

use std::sync::Arc;
use std::time::{Duration, Instant as StdInstant};

use parking_lot::RwLock;
use pitchside_core::{
    AggregateConfig, AggregateSnapshot, Feed, FeedFields, PitchsideError, SoftFailureMarker,
    interpret,
};
use pitchside_upstream::Upstream;
use serde_json::Value;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::cache::clock::{Clock, TokioClock};
use crate::metrics::CacheMetrics;

/// Error del cache: no snapshot was ever fetched and the current attempt failed.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to fetch aggregate feed: {0}")]
    Fetch(#[source] PitchsideError),
}

impl CacheError {
    /// The underlying upstream failure.
    pub fn cause(&self) -> &PitchsideError {
        match self {
            CacheError::Fetch(cause) => cause,
        }
    }
}

/// Configuracion del cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Freshness window (default: 60 seconds).
    pub ttl: Duration,
    /// Where and how the aggregate document is fetched.
    pub aggregate: AggregateConfig,
    /// Marker for failures reported inside a 2xx response.
    pub soft_failure: SoftFailureMarker,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            aggregate: AggregateConfig::default(),
            soft_failure: SoftFailureMarker::default(),
        }
    }
}

/// The single cached value: an immutable snapshot and when it was fetched.
#[derive(Debug)]
struct CacheEntry {
    snapshot: Arc<AggregateSnapshot>,
    fetched_at: Instant,
}

/// Read-only view of the cache state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStatus {
    /// A fetch has succeeded at least once.
    pub populated: bool,
    /// The entry is younger than the TTL.
    pub fresh: bool,
    /// Time since the last successful fetch.
    pub age: Option<Duration>,
}

/// Cache of the upstream aggregate document.
///
/// Holds at most one entry. The entry is only ever replaced by a successful
/// refresh, so a failed refresh leaves the previous snapshot in place and
/// that snapshot is served instead of the error.
///
/// Concurrent misses are not coalesced: each one fetches, and the last
/// successful fetch wins. Entries are swapped whole behind an `Arc`, so a
/// reader never observes a partially updated snapshot.
///
/// # Examples
///
/// ```ignore
/// use std::sync::Arc;
/// use pitchside_server::cache::{AggregateCache, CacheConfig};
///
/// let cache = AggregateCache::new(upstream, CacheConfig::default());
/// let live = cache.live_matches().await?;
/// ```
pub struct AggregateCache {
    entry: RwLock<Option<Arc<CacheEntry>>>,
    upstream: Arc<dyn Upstream>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
    metrics: CacheMetrics,
}

impl AggregateCache {
    /// Crea un cache vacio que usa el reloj de tokio.
    pub fn new(upstream: Arc<dyn Upstream>, config: CacheConfig) -> Self {
        Self::with_clock(upstream, config, Arc::new(TokioClock))
    }

    /// Crea un cache vacio con un reloj inyectado.
    pub fn with_clock(
        upstream: Arc<dyn Upstream>,
        config: CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            entry: RwLock::new(None),
            upstream,
            clock,
            config,
            metrics: CacheMetrics::new(),
        }
    }

    /// Returns the current aggregate snapshot.
    ///
    /// A fresh entry is returned without touching the network. Otherwise one
    /// fetch is attempted; on failure any previous entry, however old, is
    /// returned instead.
    ///
    /// # Errors
    ///
    /// [`CacheError::Fetch`] only when the cache has never been populated and
    /// this fetch failed too.
    pub async fn snapshot(&self) -> Result<Arc<AggregateSnapshot>, CacheError> {
        let now = self.clock.now();

        if let Some(entry) = self.current()
            && self.is_fresh(&entry, now)
        {
            self.metrics.record_hit();
            return Ok(Arc::clone(&entry.snapshot));
        }

        self.metrics.record_miss();

        let start = StdInstant::now();
        let result = self.fetch().await;
        self.metrics.record_refresh_duration(start.elapsed());

        match result {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                let entry = Arc::new(CacheEntry {
                    snapshot: Arc::clone(&snapshot),
                    fetched_at: self.clock.now(),
                });
                *self.entry.write() = Some(entry);

                info!(
                    upstream = self.upstream.name(),
                    fields = snapshot.fields().count(),
                    "Aggregate feed refreshed"
                );
                Ok(snapshot)
            },
            Err(error) => {
                self.metrics.record_fetch_failure();

                // Re-read: a concurrent refresh may have succeeded meanwhile.
                match self.current() {
                    Some(entry) => {
                        self.metrics.record_stale_served();
                        warn!(
                            error = %error,
                            age_secs = self.clock.now().duration_since(entry.fetched_at).as_secs(),
                            "Aggregate refresh failed, serving stale snapshot"
                        );
                        Ok(Arc::clone(&entry.snapshot))
                    },
                    None => {
                        warn!(error = %error, "Aggregate fetch failed with no cached snapshot");
                        Err(CacheError::Fetch(error))
                    },
                }
            },
        }
    }

    /// Projects one feed out of the current snapshot.
    ///
    /// A feed missing from the snapshot is an empty array.
    pub async fn feed(&self, feed: Feed) -> Result<Value, CacheError> {
        let snapshot = self.snapshot().await?;
        debug!(feed = %feed, "Projecting feed from aggregate snapshot");
        Ok(snapshot.feed(feed, self.fields()))
    }

    pub async fn live_matches(&self) -> Result<Value, CacheError> {
        self.feed(Feed::Live).await
    }

    pub async fn upcoming_matches(&self) -> Result<Value, CacheError> {
        self.feed(Feed::Upcoming).await
    }

    pub async fn series_list(&self) -> Result<Value, CacheError> {
        self.feed(Feed::Series).await
    }

    pub async fn news(&self) -> Result<Value, CacheError> {
        self.feed(Feed::News).await
    }

    /// Reports whether the cache is populated and fresh, without fetching.
    pub fn status(&self) -> CacheStatus {
        match self.current() {
            Some(entry) => {
                let now = self.clock.now();
                CacheStatus {
                    populated: true,
                    fresh: self.is_fresh(&entry, now),
                    age: Some(now.duration_since(entry.fetched_at)),
                }
            },
            None => CacheStatus {
                populated: false,
                fresh: false,
                age: None,
            },
        }
    }

    /// Retorna el TTL configurado.
    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    /// Feed field names used for projection.
    pub fn fields(&self) -> &FeedFields {
        &self.config.aggregate.fields
    }

    /// Retorna las metricas para acceso externo.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    fn current(&self) -> Option<Arc<CacheEntry>> {
        self.entry.read().clone()
    }

    fn is_fresh(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.fetched_at) < self.config.ttl
    }

    async fn fetch(&self) -> Result<AggregateSnapshot, PitchsideError> {
        let response = self.upstream.send(&self.config.aggregate.request()).await?;
        let document = interpret(response, &self.config.soft_failure)?;
        self.config.aggregate.snapshot(document)
    }
}
