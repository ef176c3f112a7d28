//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Storage**: Counts stored URLs
/// 2. **Click Queue**: Checks the channel is open and reports free capacity
/// 3. **Cache**: Reports size and hit rate, or that caching is disabled
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let storage = check_storage(&state).await;
    let click_queue = check_click_queue(&state);
    let cache = check_cache(&state);

    let all_healthy = storage.is_ok() && click_queue.is_ok() && cache.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            storage,
            click_queue,
            cache,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_storage(state: &AppState) -> CheckStatus {
    match state.url_service.count().await {
        Ok(total) => CheckStatus::ok(format!("{total} URLs stored")),
        Err(e) => CheckStatus::error(format!("Storage error: {e}")),
    }
}

fn check_click_queue(state: &AppState) -> CheckStatus {
    if state.click_sender.is_closed() {
        CheckStatus::error("Click queue is closed")
    } else {
        CheckStatus::ok(format!("Capacity: {}", state.click_sender.capacity()))
    }
}

fn check_cache(state: &AppState) -> CheckStatus {
    if !state.url_service.cache_enabled() {
        return CheckStatus::ok("Disabled");
    }

    let stats = state.url_service.cache_stats();
    CheckStatus::ok(format!(
        "{}/{} entries, hit rate {:.2}%",
        stats.size, stats.max_size, stats.hit_rate
    ))
}
