//! Application state.

use std::sync::Arc;

use pitchside_core::SoftFailureMarker;
use pitchside_upstream::Upstream;

use crate::cache::{AggregateCache, CacheConfig};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cache of the aggregate document.
    cache: Arc<AggregateCache>,

    /// Upstream used for pass-through requests.
    upstream: Arc<dyn Upstream>,

    soft_failure: Arc<SoftFailureMarker>,
}

impl AppState {
    /// Creates the state; the cache and the pass-through share one upstream.
    pub fn new(upstream: Arc<dyn Upstream>, config: CacheConfig) -> Self {
        let soft_failure = Arc::new(config.soft_failure.clone());
        let cache = Arc::new(AggregateCache::new(Arc::clone(&upstream), config));

        Self {
            cache,
            upstream,
            soft_failure,
        }
    }

    /// Returns the aggregate cache.
    pub fn cache(&self) -> &AggregateCache {
        self.cache.as_ref()
    }

    /// Returns the upstream.
    pub fn upstream(&self) -> &dyn Upstream {
        self.upstream.as_ref()
    }

    /// Returns the soft-failure marker.
    pub fn soft_failure(&self) -> &SoftFailureMarker {
        self.soft_failure.as_ref()
    }
}
