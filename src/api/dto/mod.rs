//! Data Transfer Objects for API request/response serialization.

pub mod cache;
pub mod health;
pub mod list;
pub mod shorten;
pub mod update_url;
pub mod url;
