//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code or custom alias to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Popular links are served from the cache and their click is recorded in
/// the background; everything else is read from storage. Redirects are not
/// rate limited.
///
/// # Errors
///
/// Returns 404 Not Found if the key is unknown.
/// Returns 410 Gone if the link has expired.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let resolved = state.url_service.resolve(&code).await?;
    Ok(Redirect::temporary(&resolved.destination))
}
