//! Destination URL sanitization.
//!
//! Accepts what users paste (bare hostnames, mixed-case hosts, explicit
//! default ports) and produces a canonical absolute `http(s)` URL.

use serde_json::json;
use url::Url;

use crate::error::AppError;

/// Longest destination accepted, in bytes of the sanitized form.
pub const MAX_URL_LENGTH: usize = 2048;

const FORBIDDEN_SCHEMES: &[&str] = &["javascript:", "data:", "vbscript:", "file:", "mailto:", "ftp:"];

/// Errors that can occur during URL sanitization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("URL cannot be empty")]
    Empty,

    #[error("URL is too long (max {max} characters)")]
    TooLong { max: usize },

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,
}

impl From<UrlNormalizationError> for AppError {
    fn from(e: UrlNormalizationError) -> Self {
        AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() }))
    }
}

/// Sanitizes a user-supplied destination.
///
/// # Rules
///
/// 1. Surrounding whitespace is trimmed
/// 2. A missing scheme defaults to `https://`
/// 3. Any scheme other than HTTP and HTTPS is rejected
/// 4. The hostname is lowercased and a default port is dropped
/// 5. Path, query and fragment are preserved
/// 6. The result must not exceed [`MAX_URL_LENGTH`]
///
/// # Examples
///
/// ```ignore
/// assert_eq!(sanitize_url("Example.com/Path").unwrap(), "https://example.com/Path");
/// ```
pub fn sanitize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }

    let lower = trimmed.to_ascii_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else if lower.contains("://") || FORBIDDEN_SCHEMES.iter().any(|s| lower.starts_with(s)) {
        return Err(UrlNormalizationError::UnsupportedProtocol);
    } else {
        format!("https://{}", trimmed)
    };

    let normalized = normalize_url(&candidate)?;
    if normalized.len() > MAX_URL_LENGTH {
        return Err(UrlNormalizationError::TooLong {
            max: MAX_URL_LENGTH,
        });
    }

    Ok(normalized)
}

/// Normalizes an absolute URL: lowercases the host and removes default ports.
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let mut url =
        Url::parse(input).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    let Some(host) = url.host_str() else {
        return Err(UrlNormalizationError::InvalidFormat("missing host".to_string()));
    };
    let host = host.to_ascii_lowercase();
    url.set_host(Some(&host))
        .map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    // `Url` already drops a port equal to the scheme default
    Ok(url.to_string())
}
