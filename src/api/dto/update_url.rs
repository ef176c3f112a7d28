//! DTO for the update endpoint.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_with::serde_as;
use validator::Validate;

use crate::domain::entities::ShortUrlPatch;

/// Request body for `PATCH /api/urls/{code}`.
///
/// # `expires_at` semantics
///
/// - **Absent** → leave existing value unchanged
/// - **`null`** → clear expiry (link never expires)
/// - **Timestamp** → set new expiry
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUrlRequest {
    /// New destination URL.
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl From<UpdateUrlRequest> for ShortUrlPatch {
    fn from(req: UpdateUrlRequest) -> Self {
        Self {
            original_url: req.url,
            expires_at: req.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ShortUrlPatch {
        serde_json::from_str::<UpdateUrlRequest>(json).unwrap().into()
    }

    #[test]
    fn test_absent_expiry_is_unchanged() {
        let patch = parse(r#"{"url": "https://example.org"}"#);
        assert_eq!(patch.original_url.as_deref(), Some("https://example.org"));
        assert_eq!(patch.expires_at, None);
    }

    #[test]
    fn test_null_expiry_clears() {
        let patch = parse(r#"{"expires_at": null}"#);
        assert_eq!(patch.expires_at, Some(None));
        assert!(patch.changes_destination());
    }

    #[test]
    fn test_timestamp_expiry_sets() {
        let patch = parse(r#"{"expires_at": "2030-01-01T00:00:00Z"}"#);
        assert!(matches!(patch.expires_at, Some(Some(_))));
    }

    #[test]
    fn test_empty_body_changes_nothing() {
        assert!(!parse("{}").changes_destination());
    }
}
