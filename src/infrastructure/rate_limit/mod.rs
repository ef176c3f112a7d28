//! In-process rate limiting for mutating endpoints.
//!
//! State is per process and is lost on restart.

mod token_bucket;

pub use token_bucket::{RateLimitConfig, RateLimiter};
