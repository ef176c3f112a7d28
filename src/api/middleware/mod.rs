//! HTTP middleware for request processing.

pub mod client_key;
pub mod tracing;
