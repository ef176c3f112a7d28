//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures owned by storage and passed by value
//! into the runtime core.
//!
//! # Design Pattern
//!
//! Entities follow the "New Type" pattern with separate structs for creation
//! and partial updates:
//! - [`NewShortUrl`] - For creating new records
//! - [`ShortUrlPatch`] - For partial updates

pub mod short_url;

pub use short_url::{NewShortUrl, ShortUrl, ShortUrlPatch};
