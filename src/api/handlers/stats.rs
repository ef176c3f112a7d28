//! Handler for the service summary.

use axum::{Json, extract::State};

use crate::application::services::ServiceSummary;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/stats`: total URLs, base URL and cache statistics.
pub async fn summary_handler(
    State(state): State<AppState>,
) -> Result<Json<ServiceSummary>, AppError> {
    Ok(Json(state.url_service.summary().await?))
}
