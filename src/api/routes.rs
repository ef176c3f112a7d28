//! API route configuration.

use crate::api::handlers::{
    cache_clear_handler, cache_reset_stats_handler, cache_stats_handler, delete_url_handler, list_urls_handler,
    shorten_handler, summary_handler, update_url_handler, url_stats_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

/// Routes mounted under `/api`.
///
/// # Endpoints
///
/// - `POST   /shorten`            - Create a short URL (rate limited)
/// - `GET    /urls`               - List short URLs, newest first
/// - `GET    /urls/{code}/stats`  - Statistics for one short URL
/// - `PATCH  /urls/{code}`        - Change destination or expiry (rate limited)
/// - `DELETE /urls/{code}`        - Delete a short URL (rate limited)
/// - `GET    /stats`              - Service summary
/// - `GET    /cache/stats`        - Cache statistics
/// - `DELETE /cache/stats`        - Reset cache hit and miss counters
/// - `DELETE /cache`              - Drop every cache entry
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/urls", get(list_urls_handler))
        .route("/urls/{code}/stats", get(url_stats_handler))
        .route(
            "/urls/{code}",
            patch(update_url_handler).delete(delete_url_handler),
        )
        .route("/stats", get(summary_handler))
        .route(
            "/cache/stats",
            get(cache_stats_handler).delete(cache_reset_stats_handler),
        )
        .route("/cache", delete(cache_clear_handler))
}
