//! Application layer services implementing business logic.
//!
//! This layer coordinates the encoder, the cache and the rate limiter with
//! the storage repository. HTTP handlers call into it and never touch those
//! components directly.
//!
//! # Available Services
//!
//! - [`services::url_service::UrlService`] - Short URL creation, redirects, updates and stats

pub mod services;
