//! Storage implementations of the domain repository traits.
//!
//! # Repositories
//!
//! - [`MemoryUrlRepository`] - in-process short URL storage

pub mod memory_url_repository;

pub use memory_url_repository::MemoryUrlRepository;
