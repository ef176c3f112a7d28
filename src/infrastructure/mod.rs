//! In-process infrastructure behind the domain and application seams.
//!
//! - [`cache`] - Bounded LRU cache with TTL and a no-op variant
//! - [`rate_limit`] - Per-client token bucket limiter
//! - [`persistence`] - In-memory [`UrlRepository`](crate::domain::repositories::UrlRepository)
//! - [`maintenance`] - Periodic sweep of expired entries and idle buckets

pub mod cache;
pub mod maintenance;
pub mod persistence;
pub mod rate_limit;
