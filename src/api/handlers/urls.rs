//! Handlers for short URL management: list, stats, update, delete.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde_json::json;
use validator::Validate;

use super::rate_limit::rate_limit_headers;
use crate::api::dto::list::{ListQuery, UrlListResponse};
use crate::api::dto::update_url::UpdateUrlRequest;
use crate::api::dto::url::{UrlResponse, UrlStatsResponse};
use crate::api::middleware::client_key::ClientKey;
use crate::error::AppError;
use crate::state::AppState;

/// Lists short URLs, newest first.
///
/// # Endpoint
///
/// `GET /api/urls?limit=100&offset=0`
///
/// # Errors
///
/// Returns 400 Bad Request if `limit` is outside 1..=1000.
pub async fn list_urls_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<UrlListResponse>, AppError> {
    let (limit, offset) = query
        .limit_offset()
        .map_err(|e| AppError::bad_request("Invalid pagination", json!({ "reason": e })))?;

    let service = &state.url_service;
    let total = service.count().await?;
    let items = service
        .list(limit, offset)
        .await?
        .into_iter()
        .map(|r| UrlResponse::from_record(r, |key| service.short_url(key)))
        .collect();

    Ok(Json(UrlListResponse {
        total,
        limit,
        offset,
        items,
    }))
}

/// Returns statistics for one short URL, including expired ones.
///
/// # Endpoint
///
/// `GET /api/urls/{code}/stats`
///
/// # Errors
///
/// Returns 404 Not Found if the key is unknown.
pub async fn url_stats_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UrlStatsResponse>, AppError> {
    let stats = state.url_service.stats(&code).await?;
    Ok(Json(stats.into()))
}

/// Partially updates a short URL.
///
/// # Endpoint
///
/// `PATCH /api/urls/{code}`
///
/// ```json
/// {
///   "url": "https://new-destination.com",
///   "expires_at": "2030-12-31T23:59:59Z"  // null to clear
/// }
/// ```
///
/// Cached entries for the record are invalidated, so the next redirect sees
/// the new destination. The response carries `X-RateLimit-*` headers.
///
/// # Errors
///
/// Returns 400 Bad Request if the body is empty or invalid.
/// Returns 404 Not Found if the key is unknown.
/// Returns 429 Too Many Requests when over the limit.
pub async fn update_url_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    Extension(client): Extension<ClientKey>,
    Json(payload): Json<UpdateUrlRequest>,
) -> Result<(HeaderMap, Json<UrlResponse>), AppError> {
    payload.validate()?;

    let service = &state.url_service;
    let record = service
        .update(client.as_str(), &code, payload.into())
        .await?;

    Ok((
        rate_limit_headers(service.rate_limit_status(client.as_str())),
        Json(UrlResponse::from_record(record, |key| service.short_url(key))),
    ))
}

/// Deletes a short URL and returns the removed record.
///
/// # Endpoint
///
/// `DELETE /api/urls/{code}`
///
/// The response carries `X-RateLimit-*` headers.
///
/// # Errors
///
/// Returns 404 Not Found if the key is unknown.
/// Returns 429 Too Many Requests when over the limit.
pub async fn delete_url_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    Extension(client): Extension<ClientKey>,
) -> Result<(HeaderMap, Json<UrlResponse>), AppError> {
    let service = &state.url_service;
    let record = service.delete(client.as_str(), &code).await?;

    Ok((
        rate_limit_headers(service.rate_limit_status(client.as_str())),
        Json(UrlResponse::from_record(record, |key| service.short_url(key))),
    ))
}
