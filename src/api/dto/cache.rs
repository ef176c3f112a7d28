//! DTOs for cache administration endpoints.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CacheClearResponse {
    pub cleared: bool,
    pub message: String,
}
