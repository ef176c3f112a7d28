//! Business logic services for the application layer.

pub mod url_service;

pub use url_service::{
    RateLimitStatus, Resolved, ServiceSummary, ShortenCommand, UrlService, UrlServiceSettings,
    UrlStats,
};
