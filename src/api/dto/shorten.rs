//! DTOs for the shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::ShortenCommand;

/// Request body for `POST /api/shorten`.
///
/// Alias charset, reserved words and configured length bounds are enforced by
/// the service; the DTO only rejects obviously oversized input.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// Destination URL. A missing scheme defaults to `https://`.
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,

    #[validate(length(max = 64, message = "Alias is too long"))]
    pub custom_alias: Option<String>,

    /// After this time the link answers 410 Gone.
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<ShortenRequest> for ShortenCommand {
    fn from(req: ShortenRequest) -> Self {
        Self {
            original_url: req.url,
            custom_alias: req.custom_alias,
            expires_at: req.expires_at,
        }
    }
}

/// Created short URL.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_alias: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}
