//! In-process cache backed by [`LruTtlCache`].

use std::time::Duration;

use metrics::counter;
use tracing::{debug, info};

use super::lru_ttl::{CacheStats, LruTtlCache};
use super::service::{CacheService, CachedUrl};

/// Bounded LRU cache for redirect targets.
///
/// Entries expire `ttl` after insertion. Lookups, evictions and misses are
/// counted both in [`CacheStats`] and as `metrics` counters.
pub struct MemoryCache {
    entries: LruTtlCache<CachedUrl>,
}

impl MemoryCache {
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        info!(
            "Using in-memory cache (max_size={}, ttl={}s)",
            max_size,
            ttl.as_secs()
        );
        Self {
            entries: LruTtlCache::new(max_size, ttl),
        }
    }
}

impl CacheService for MemoryCache {
    fn get_url(&self, key: &str) -> Option<CachedUrl> {
        match self.entries.get(key) {
            Some(value) => {
                debug!("Cache HIT: {} -> {}", key, value.destination);
                counter!("cache_hits_total").increment(1);
                Some(value)
            }
            None => {
                debug!("Cache MISS: {}", key);
                counter!("cache_misses_total").increment(1);
                None
            }
        }
    }

    fn set_url(&self, key: &str, value: CachedUrl) {
        debug!("Cache SET: {} -> {}", key, value.destination);
        if let Some(evicted) = self.entries.insert(key, value) {
            debug!("Cache EVICT: {}", evicted);
            counter!("cache_evictions_total").increment(1);
        }
    }

    fn invalidate(&self, key: &str) -> bool {
        let removed = self.entries.invalidate(key);
        if removed {
            debug!("Cache INVALIDATE: {}", key);
        }
        removed
    }

    fn stats(&self) -> CacheStats {
        self.entries.stats()
    }

    fn reset_stats(&self) {
        self.entries.reset_stats();
    }

    fn clear(&self) {
        self.entries.clear();
        info!("Cache cleared");
    }

    fn purge_expired(&self) -> usize {
        let purged = self.entries.purge_expired();
        if purged > 0 {
            debug!("Cache purged {} expired entries", purged);
        }
        purged
    }

    fn is_enabled(&self) -> bool {
        true
    }
}
