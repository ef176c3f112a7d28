//! Handler for the shortening endpoint.

use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use validator::Validate;

use super::rate_limit::rate_limit_headers;
use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::middleware::client_key::ClientKey;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "custom_alias": "promo",                // optional
///   "expires_at": "2030-01-01T00:00:00Z"   // optional
/// }
/// ```
///
/// # Response
///
/// `201 Created` with `X-RateLimit-Limit`, `X-RateLimit-Remaining` and
/// `X-RateLimit-Window` headers.
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 409 Conflict if the alias is taken.
/// Returns 429 Too Many Requests with `Retry-After` when over the limit.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Extension(client): Extension<ClientKey>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, HeaderMap, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let service = &state.url_service;
    let record = service.shorten(client.as_str(), payload.into()).await?;

    let short_code = record.short_code.clone().unwrap_or_default();
    let short_url = service.short_url(record.public_key().unwrap_or(&short_code));

    let headers = rate_limit_headers(service.rate_limit_status(client.as_str()));

    Ok((
        StatusCode::CREATED,
        headers,
        Json(ShortenResponse {
            short_code,
            short_url,
            original_url: record.original_url,
            custom_alias: record.custom_alias,
            created_at: record.created_at,
            expires_at: record.expires_at,
        }),
    ))
}
