//! No-op cache implementation for disabled caching.

use super::lru_ttl::CacheStats;
use super::service::{CacheService, CachedUrl};
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Used when `CACHE_ENABLED=false`. Every lookup is a miss and nothing is
/// stored, so redirects always go to storage. Counters stay at zero.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheService for NullCache {
    fn get_url(&self, _key: &str) -> Option<CachedUrl> {
        None
    }

    fn set_url(&self, _key: &str, _value: CachedUrl) {}

    fn invalidate(&self, _key: &str) -> bool {
        false
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            size: 0,
            max_size: 0,
            hits: 0,
            misses: 0,
            hit_rate: 0.0,
            total_requests: 0,
        }
    }

    fn reset_stats(&self) {}

    fn clear(&self) {}

    fn purge_expired(&self) -> usize {
        0
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_cache_never_stores() {
        let cache = NullCache::new();
        cache.set_url("abc", CachedUrl::new("https://example.com", None));

        assert!(cache.get_url("abc").is_none());
        assert!(!cache.invalidate("abc"));
        assert!(!cache.is_enabled());
        assert_eq!(cache.stats().total_requests, 0);
    }
}
