//! REST API layer for HTTP request/response handling.
//!
//! Translates HTTP requests into [`UrlService`](crate::application::services::UrlService)
//! calls and formats the responses.
//!
//! - [`dto`] - Request/response bodies
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Client key resolution and request tracing
//! - [`routes`] - `/api` route table

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
