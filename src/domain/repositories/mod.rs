//! Repository trait definitions for the domain layer.
//!
//! Storage is an external collaborator of the runtime core. This module
//! defines the contract it must satisfy; implementations live in
//! `crate::infrastructure::persistence` and mocks are generated via `mockall`
//! for unit tests.

pub mod url_repository;

pub use url_repository::UrlRepository;

#[cfg(test)]
pub use url_repository::MockUrlRepository;
