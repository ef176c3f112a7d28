//! Helpers shared across layers.
//!
//! - [`code_generator`] - Base62 short codes and custom alias validation
//! - [`url_normalizer`] - URL sanitization and normalization
//! - [`client_key`] - Rate limiting key from peer address or proxy headers

pub mod client_key;
pub mod code_generator;
pub mod url_normalizer;
