//! Handlers for cache administration.

use axum::{Json, extract::State};

use crate::api::dto::cache::CacheClearResponse;
use crate::infrastructure::cache::CacheStats;
use crate::state::AppState;

/// `GET /api/cache/stats`
///
/// ```json
/// {
///   "size": 42,
///   "max_size": 1000,
///   "hits": 900,
///   "misses": 100,
///   "hit_rate": 90.0,
///   "total_requests": 1000
/// }
/// ```
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.url_service.cache_stats())
}

/// `DELETE /api/cache/stats`: zeroes hits and misses, keeps entries, and
/// returns the statistics after the reset.
pub async fn cache_reset_stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.url_service.reset_cache_stats())
}

/// `DELETE /api/cache`: drops every entry and resets the counters.
pub async fn cache_clear_handler(State(state): State<AppState>) -> Json<CacheClearResponse> {
    state.url_service.clear_cache();

    Json(CacheClearResponse {
        cleared: true,
        message: "Cache cleared".to_string(),
    })
}
