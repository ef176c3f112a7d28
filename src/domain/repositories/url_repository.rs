//! Repository trait for short URL data access.

use crate::domain::entities::{NewShortUrl, ShortUrl, ShortUrlPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage interface consumed by the runtime core.
///
/// A `key` is either a derived short code or a custom alias; implementations
/// check the short code first, then the alias.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryUrlRepository`] - in-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Persists a draft record (no short code yet) and assigns its identity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the custom alias is already used as
    /// an alias or as a derived short code.
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError>;

    /// Writes the derived short code back to the record with identity `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this identity.
    /// Returns [`AppError::Conflict`] if another record already owns the code.
    /// Aliases are a separate namespace and never block a derived code.
    async fn assign_short_code(&self, id: i64, short_code: &str) -> Result<ShortUrl, AppError>;

    /// Removes the record with identity `id`, if any. Used to discard a
    /// draft whose code write-back failed.
    async fn delete_by_id(&self, id: i64) -> Result<(), AppError>;

    /// Finds a record by short code, falling back to custom alias.
    async fn find_by_code_or_alias(&self, key: &str) -> Result<Option<ShortUrl>, AppError>;

    /// Partially updates a record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record answers to `key`.
    async fn update(&self, key: &str, patch: ShortUrlPatch) -> Result<ShortUrl, AppError>;

    /// Deletes a record. Returns the removed record, or `None` if not found.
    async fn delete(&self, key: &str) -> Result<Option<ShortUrl>, AppError>;

    /// Increments the click counter, stamps `last_accessed_at`, and returns the
    /// new click count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record answers to `key`.
    async fn increment_clicks(&self, key: &str) -> Result<u64, AppError>;

    /// Lists records ordered by identity, newest first.
    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<ShortUrl>, AppError>;

    /// Counts all records.
    async fn count(&self) -> Result<u64, AppError>;
}
