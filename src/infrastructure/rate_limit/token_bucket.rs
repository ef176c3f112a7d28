//! Per-client token bucket rate limiter.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use metrics::counter;
use tracing::debug;

/// Rate limiter settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
    /// When false every request is admitted.
    pub enabled: bool,
    /// Bucket capacity, also the number of tokens refilled per window.
    pub capacity: u32,
    pub window: Duration,
    /// A bucket untouched for this many windows is dropped.
    pub idle_windows: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 10,
            window: Duration::from_secs(60),
            idle_windows: 10,
        }
    }
}

impl RateLimitConfig {
    pub fn idle_timeout(&self) -> Duration {
        self.window.saturating_mul(self.idle_windows)
    }
}

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn full(capacity: u32, now: Instant) -> Self {
        Self {
            tokens: capacity as f64,
            last_refill: now,
        }
    }

    /// Token count as of `now`, without mutating the bucket.
    fn available_at(&self, now: Instant, config: &RateLimitConfig) -> f64 {
        let elapsed = now.saturating_duration_since(self.last_refill);
        let capacity = config.capacity as f64;
        (self.tokens + elapsed.as_secs_f64() * capacity / config.window.as_secs_f64()).min(capacity)
    }

    fn refill(&mut self, now: Instant, config: &RateLimitConfig) {
        self.tokens = self.available_at(now, config);
        if now > self.last_refill {
            self.last_refill = now;
        }
    }

    fn try_consume(&mut self, cost: f64) -> bool {
        if self.tokens >= cost {
            self.tokens -= cost;
            true
        } else {
            false
        }
    }

    fn is_idle_at(&self, now: Instant, idle_timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_refill) > idle_timeout
    }
}

/// Token bucket rate limiter keyed by client identity.
///
/// Each key gets a bucket of `capacity` tokens, created full on first use
/// and refilled lazily at `capacity / window` tokens per second. Buckets live
/// in a sharded map; refill and consume for one key happen under that key's
/// shard lock, so concurrent requests from the same client are serialized.
///
/// A bucket idle for longer than [`RateLimitConfig::idle_timeout`] is dropped,
/// either on its next access or by [`RateLimiter::purge_idle_at`]. Dropping
/// it is equivalent to resetting the client to full capacity.
pub struct RateLimiter {
    config: RateLimitConfig,
    buckets: DashMap<String, TokenBucket>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            buckets: DashMap::new(),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Admits one request for `key` now.
    pub fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now(), 1)
    }

    /// Refills the bucket for `key` as of `now` and tries to take `cost`
    /// tokens. A denial leaves the bucket untouched apart from the refill.
    pub fn allow_at(&self, key: &str, now: Instant, cost: u32) -> bool {
        if !self.config.enabled {
            return true;
        }

        let idle_timeout = self.config.idle_timeout();
        self.buckets
            .remove_if(key, |_, bucket| bucket.is_idle_at(now, idle_timeout));

        let allowed = {
            let mut bucket = self
                .buckets
                .entry(key.to_string())
                .or_insert_with(|| TokenBucket::full(self.config.capacity, now));
            bucket.refill(now, &self.config);
            bucket.try_consume(cost as f64)
        };

        if !allowed {
            debug!(client = %key, "Rate limit exceeded");
            counter!("rate_limit_rejections_total").increment(1);
        }

        allowed
    }

    pub fn remaining(&self, key: &str) -> u32 {
        self.remaining_at(key, Instant::now())
    }

    /// Whole tokens `key` could spend at `now`. Unknown and idle keys report
    /// full capacity.
    pub fn remaining_at(&self, key: &str, now: Instant) -> u32 {
        if !self.config.enabled {
            return self.config.capacity;
        }

        match self.buckets.get(key) {
            Some(bucket) if !bucket.is_idle_at(now, self.config.idle_timeout()) => {
                bucket.available_at(now, &self.config).floor() as u32
            }
            _ => self.config.capacity,
        }
    }

    /// Seconds until `key` has at least one whole token again, at least 1.
    pub fn retry_after_secs(&self, key: &str) -> u64 {
        self.retry_after_secs_at(key, Instant::now())
    }

    pub fn retry_after_secs_at(&self, key: &str, now: Instant) -> u64 {
        let available = match self.buckets.get(key) {
            Some(bucket) => bucket.available_at(now, &self.config),
            None => return 1,
        };

        let deficit = (1.0 - available).max(0.0);
        let secs = deficit * self.config.window.as_secs_f64() / self.config.capacity as f64;
        (secs.ceil() as u64).max(1)
    }

    /// Drops every bucket idle as of `now` and returns how many were removed.
    pub fn purge_idle_at(&self, now: Instant) -> usize {
        let idle_timeout = self.config.idle_timeout();
        let before = self.buckets.len();
        self.buckets
            .retain(|_, bucket| !bucket.is_idle_at(now, idle_timeout));
        before.saturating_sub(self.buckets.len())
    }

    pub fn purge_idle(&self) -> usize {
        self.purge_idle_at(Instant::now())
    }

    /// Number of tracked buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
