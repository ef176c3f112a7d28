//! # snaplink
//!
//! A URL shortener whose hot path is served from memory: deterministic
//! Base62 short codes, a bounded LRU cache with TTL that only admits popular
//! links, and per-client token bucket rate limiting on mutations.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Records, the storage contract and click processing
//! - **Application Layer** ([`application`]) - The [`UrlService`](application::services::UrlService) coordinator
//! - **Infrastructure Layer** ([`infrastructure`]) - Cache, rate limiter, in-memory storage, maintenance
//! - **API Layer** ([`api`]) - REST handlers, DTOs and middleware
//!
//! ## Quick Start
//!
//! ```bash
//! export BASE_URL="https://s.example.com"
//! cargo run
//!
//! curl -X POST localhost:3000/api/shorten -H 'content-type: application/json' \
//!      -d '{"url": "https://example.com/a/very/long/path"}'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{ShortenCommand, UrlService, UrlServiceSettings};
    pub use crate::domain::entities::{NewShortUrl, ShortUrl, ShortUrlPatch};
    pub use crate::error::AppError;
    pub use crate::infrastructure::cache::{CacheService, CacheStats, MemoryCache};
    pub use crate::infrastructure::rate_limit::{RateLimitConfig, RateLimiter};
    pub use crate::state::AppState;
    pub use crate::utils::code_generator::{Base62Encoder, CodeEncoder, ShortCodeGenerator};
}
