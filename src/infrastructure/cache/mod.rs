//! Caching layer for fast redirect lookups.
//!
//! Provides a [`CacheService`] trait with two implementations:
//! - [`MemoryCache`] - bounded LRU cache with per-entry TTL
//! - [`NullCache`] - No-op implementation for disabled caching
//!
//! The LRU/TTL mechanism itself lives in [`LruTtlCache`] and knows nothing
//! about URLs.

mod lru_ttl;
mod memory_cache;
mod null_cache;
mod service;

pub use lru_ttl::{CacheStats, LruTtlCache};
pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use service::{CacheService, CachedUrl};
