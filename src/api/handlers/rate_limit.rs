//! `X-RateLimit-*` headers attached to rate limited responses.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::application::services::RateLimitStatus;

const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
const X_RATELIMIT_WINDOW: HeaderName = HeaderName::from_static("x-ratelimit-window");

pub(crate) fn rate_limit_headers(status: RateLimitStatus) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(status.limit));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(status.remaining));
    headers.insert(X_RATELIMIT_WINDOW, HeaderValue::from(status.window_secs));
    headers
}
