//! Cache service trait and cached value type.

use chrono::{DateTime, Utc};

use super::lru_ttl::CacheStats;

/// Redirect target as held by the cache.
///
/// The record's own expiry travels with the destination so a cache hit can
/// still reject an expired link.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedUrl {
    pub destination: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedUrl {
    pub fn new(destination: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            destination: destination.into(),
            expires_at,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now >= e)
    }
}

/// Trait for caching hot short URL mappings.
///
/// Implementations are in-process and never fail: a miss is a normal
/// outcome. Admission policy belongs to the caller; the cache stores whatever
/// it is given.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::MemoryCache`] - bounded LRU with TTL
/// - [`crate::infrastructure::cache::NullCache`] - no-op implementation for disabled caching
pub trait CacheService: Send + Sync {
    /// Returns the cached target for `key`, or `None` on a miss.
    fn get_url(&self, key: &str) -> Option<CachedUrl>;

    /// Stores `value` under `key`, replacing any previous entry.
    fn set_url(&self, key: &str, value: CachedUrl);

    /// Removes `key`. Returns true if an entry was present.
    fn invalidate(&self, key: &str) -> bool;

    fn stats(&self) -> CacheStats;

    fn reset_stats(&self);

    /// Drops every entry and resets the counters.
    fn clear(&self);

    /// Removes expired entries and returns how many were dropped.
    fn purge_expired(&self) -> usize;

    /// Reported by the health check.
    fn is_enabled(&self) -> bool;
}
