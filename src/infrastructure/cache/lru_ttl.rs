//! Bounded LRU map with per-entry time-to-live.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;

/// Point-in-time counters reported by the cache.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub hits: u64,
    pub misses: u64,
    /// Percentage of lookups that hit, rounded to 2 decimals.
    pub hit_rate: f64,
    pub total_requests: u64,
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

struct Inner<V> {
    entries: LruCache<String, Entry<V>>,
    hits: u64,
    misses: u64,
}

/// Thread-safe LRU cache whose entries expire a fixed TTL after insertion.
///
/// Expiry is lazy: an expired entry counts as a miss and is removed by the
/// lookup that finds it (or by [`LruTtlCache::purge_expired_at`]). Every
/// operation runs under a single mutex, so an `invalidate` that returned is
/// visible to every later lookup.
pub struct LruTtlCache<V> {
    inner: Mutex<Inner<V>>,
    max_size: usize,
    ttl: Duration,
}

impl<V: Clone> LruTtlCache<V> {
    /// `max_size` of 0 is treated as 1.
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        let cap = NonZeroUsize::new(max_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(Inner {
                entries: LruCache::new(cap),
                hits: 0,
                misses: 0,
            }),
            max_size: cap.get(),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Looks up `key` as of `now`. A hit promotes the entry to most recently
    /// used.
    pub fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        match inner.entries.peek(key).map(|e| now > e.expires_at) {
            None => {
                inner.misses += 1;
                None
            }
            Some(true) => {
                inner.entries.pop(key);
                inner.misses += 1;
                None
            }
            Some(false) => {
                inner.hits += 1;
                inner.entries.get(key).map(|e| e.value.clone())
            }
        }
    }

    pub fn insert(&self, key: &str, value: V) -> Option<String> {
        self.insert_at(key, value, Instant::now())
    }

    /// Inserts or replaces `key`, stamping its expiry as `now + ttl`.
    ///
    /// Returns the key evicted to make room, if any. Replacing an existing key
    /// never evicts.
    pub fn insert_at(&self, key: &str, value: V, now: Instant) -> Option<String> {
        let entry = Entry {
            value,
            expires_at: now + self.ttl,
        };

        let mut inner = self.inner.lock();
        match inner.entries.push(key.to_string(), entry) {
            Some((old_key, _)) if old_key != key => Some(old_key),
            _ => None,
        }
    }

    /// Removes `key`. Returns true if an entry was present.
    pub fn invalidate(&self, key: &str) -> bool {
        self.inner.lock().entries.pop(key).is_some()
    }

    /// Removes every entry whose expiry has passed as of `now`.
    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let mut inner = self.inner.lock();
        let expired: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, e)| now > e.expires_at)
            .map(|(k, _)| k.clone())
            .collect();

        for key in &expired {
            inner.entries.pop(key);
        }

        expired.len()
    }

    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let total = inner.hits + inner.misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            (inner.hits as f64 / total as f64 * 10_000.0).round() / 100.0
        };

        CacheStats {
            size: inner.entries.len(),
            max_size: self.max_size,
            hits: inner.hits,
            misses: inner.misses,
            hit_rate,
            total_requests: total,
        }
    }

    pub fn reset_stats(&self) {
        let mut inner = self.inner.lock();
        inner.hits = 0;
        inner.misses = 0;
    }

    /// Drops every entry and resets the counters.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.hits = 0;
        inner.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
