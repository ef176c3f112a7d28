//! Response views of a short URL record.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::services::UrlStats;
use crate::domain::entities::ShortUrl;

/// Short URL as returned by list, update and delete.
#[derive(Debug, Serialize)]
pub struct UrlResponse {
    pub id: i64,
    pub short_code: Option<String>,
    pub custom_alias: Option<String>,
    pub short_url: Option<String>,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: u64,
}

impl UrlResponse {
    /// `link` builds the public URL for the record's advertised key.
    pub fn from_record(record: ShortUrl, link: impl Fn(&str) -> String) -> Self {
        Self {
            short_url: record.public_key().map(link),
            id: record.id,
            short_code: record.short_code,
            custom_alias: record.custom_alias,
            original_url: record.original_url,
            created_at: record.created_at,
            expires_at: record.expires_at,
            click_count: record.click_count,
        }
    }
}

/// Response for `GET /api/urls/{code}/stats`.
#[derive(Debug, Serialize)]
pub struct UrlStatsResponse {
    pub short_code: Option<String>,
    pub custom_alias: Option<String>,
    pub original_url: String,
    pub click_count: u64,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_expired: bool,
}

impl From<UrlStats> for UrlStatsResponse {
    fn from(stats: UrlStats) -> Self {
        let r = stats.record;
        Self {
            short_code: r.short_code,
            custom_alias: r.custom_alias,
            original_url: r.original_url,
            click_count: r.click_count,
            created_at: r.created_at,
            last_accessed_at: r.last_accessed_at,
            expires_at: r.expires_at,
            is_expired: stats.is_expired,
        }
    }
}
