//! Periodic cleanup of expired cache entries and idle rate limit buckets.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::infrastructure::cache::CacheService;
use crate::infrastructure::rate_limit::RateLimiter;

/// Runs one cleanup pass. Returns `(expired_entries, idle_buckets)` removed.
///
/// Both structures also expire lazily on access, so skipping a pass never
/// changes what callers observe; it only bounds memory held by keys that
/// are never looked up again.
pub fn sweep_once(cache: &dyn CacheService, limiter: &RateLimiter) -> (usize, usize) {
    let expired = cache.purge_expired();
    let idle = limiter.purge_idle();

    if expired > 0 || idle > 0 {
        debug!(expired, idle, "Maintenance sweep");
    }

    (expired, idle)
}

/// Spawns the sweeper on the current runtime.
pub fn spawn_sweeper(
    cache: Arc<dyn CacheService>,
    limiter: Arc<RateLimiter>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            sweep_once(cache.as_ref(), &limiter);
        }
    })
}
