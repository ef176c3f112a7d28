//! Coordinator wiring the encoder, cache and rate limiter to storage.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::counter;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::{NewShortUrl, ShortUrl, ShortUrlPatch};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, CacheStats, CachedUrl};
use crate::infrastructure::rate_limit::RateLimiter;
use crate::utils::code_generator::{ShortCodeGenerator, validate_custom_alias};
use crate::utils::url_normalizer::sanitize_url;

/// Policy knobs for [`UrlService`].
#[derive(Debug, Clone)]
pub struct UrlServiceSettings {
    /// Click count at which a record is admitted into the cache.
    pub popularity_threshold: u64,
    pub alias_min_length: usize,
    pub alias_max_length: usize,
    /// Public origin used to build short links.
    pub base_url: String,
}

impl Default for UrlServiceSettings {
    fn default() -> Self {
        Self {
            popularity_threshold: 10,
            alias_min_length: 4,
            alias_max_length: 20,
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

/// Input for [`UrlService::shorten`].
#[derive(Debug, Clone, Default)]
pub struct ShortenCommand {
    pub original_url: String,
    pub custom_alias: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Outcome of a successful redirect lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub destination: String,
    pub from_cache: bool,
}

/// Per-record statistics view.
#[derive(Debug, Clone)]
pub struct UrlStats {
    pub record: ShortUrl,
    pub is_expired: bool,
}

/// Service-wide summary.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceSummary {
    pub total_urls: u64,
    pub base_url: String,
    pub cache: CacheStats,
}

/// Rate limit state reported back to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub limit: u32,
    pub remaining: u32,
    pub window_secs: u64,
}

/// Coordinates short URL creation, resolution and mutation.
///
/// # Redirects
///
/// Lookups consult the cache first. On a miss the record is read from
/// storage and its click is recorded synchronously; the record is admitted to
/// the cache only once its post-increment click count reaches
/// [`UrlServiceSettings::popularity_threshold`]. On a hit the click is handed
/// to the background worker and may be dropped under load.
///
/// # Mutations
///
/// Creating, updating and deleting are gated by the per-client rate limiter.
/// Updates and deletes invalidate every cache key of the record, plus the key
/// the caller used, once storage has been written.
pub struct UrlService {
    repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn CacheService>,
    limiter: Arc<RateLimiter>,
    generator: ShortCodeGenerator,
    clicks: mpsc::Sender<ClickEvent>,
    settings: UrlServiceSettings,
    /// Bumped on every invalidation; guards miss-path admission.
    cache_epoch: Mutex<u64>,
}

impl UrlService {
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn CacheService>,
        limiter: Arc<RateLimiter>,
        generator: ShortCodeGenerator,
        clicks: mpsc::Sender<ClickEvent>,
        settings: UrlServiceSettings,
    ) -> Self {
        Self {
            repository,
            cache,
            limiter,
            generator,
            clicks,
            settings,
            cache_epoch: Mutex::new(0),
        }
    }

    pub fn settings(&self) -> &UrlServiceSettings {
        &self.settings
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_enabled()
    }

    /// Charges one token to `client_key`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RateLimited`] when the client's bucket is empty.
    pub fn admit(&self, client_key: &str) -> Result<(), AppError> {
        if self.limiter.allow(client_key) {
            return Ok(());
        }

        let config = self.limiter.config();
        Err(AppError::rate_limited(
            self.limiter.retry_after_secs(client_key),
            json!({
                "limit": config.capacity,
                "window_seconds": config.window.as_secs(),
            }),
        ))
    }

    pub fn rate_limit_status(&self, client_key: &str) -> RateLimitStatus {
        let config = self.limiter.config();
        RateLimitStatus {
            limit: config.capacity,
            remaining: self.limiter.remaining(client_key),
            window_secs: config.window.as_secs(),
        }
    }

    /// Creates a short URL.
    ///
    /// The draft is persisted first; its storage identity is then encoded into
    /// the short code and written back.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RateLimited`] if the client is over its limit.
    /// Returns [`AppError::Validation`] if the URL, alias or expiry is invalid.
    /// Returns [`AppError::Conflict`] if the alias is already taken.
    pub async fn shorten(
        &self,
        client_key: &str,
        command: ShortenCommand,
    ) -> Result<ShortUrl, AppError> {
        self.admit(client_key)?;

        let original_url = sanitize_url(&command.original_url)?;

        if let Some(alias) = command.custom_alias.as_deref() {
            validate_custom_alias(
                alias,
                self.settings.alias_min_length,
                self.settings.alias_max_length,
            )?;
        }

        if let Some(expires_at) = command.expires_at {
            ensure_future(expires_at)?;
        }

        let draft = self
            .repository
            .create(NewShortUrl {
                original_url,
                custom_alias: command.custom_alias,
                expires_at: command.expires_at,
            })
            .await?;

        let record = match self.assign_code(draft.id).await {
            Ok(record) => record,
            Err(e) => {
                self.discard_draft(draft.id).await;
                return Err(e);
            }
        };

        // an alias record may have been cached under the same spelling
        if let Some(code) = record.short_code.as_deref() {
            self.invalidate(code, None);
        }

        info!(
            id = record.id,
            code = ?record.short_code,
            alias = ?record.custom_alias,
            "Short URL created"
        );

        Ok(record)
    }

    /// Resolves a short code or alias to its destination.
    ///
    /// A record read on the miss path is only admitted to the cache if no
    /// update or delete invalidated the cache while storage was being read,
    /// so a concurrent mutation cannot leave the old destination cached.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record answers to `key`.
    /// Returns [`AppError::Gone`] if the record has expired.
    pub async fn resolve(&self, key: &str) -> Result<Resolved, AppError> {
        if let Some(cached) = self.cache.get_url(key) {
            if cached.is_expired_at(Utc::now()) {
                self.cache.invalidate(key);
                return Err(gone(key));
            }

            self.enqueue_click(key);
            return Ok(Resolved {
                destination: cached.destination,
                from_cache: true,
            });
        }

        let epoch = self.cache_epoch();
        let record = self
            .repository
            .find_by_code_or_alias(key)
            .await?
            .ok_or_else(|| not_found(key))?;

        if record.is_expired() {
            return Err(gone(key));
        }

        let clicks = self.repository.increment_clicks(key).await?;
        if clicks >= self.settings.popularity_threshold {
            let value = CachedUrl::new(record.original_url.clone(), record.expires_at);
            if self.admit_to_cache(key, value, epoch) {
                debug!(key = %key, clicks, "Admitting popular URL to cache");
            }
        }

        Ok(Resolved {
            destination: record.original_url,
            from_cache: false,
        })
    }

    /// Changes the destination and/or expiry of a record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RateLimited`] if the client is over its limit.
    /// Returns [`AppError::Validation`] if the patch is empty or invalid.
    /// Returns [`AppError::NotFound`] if no record answers to `key`.
    pub async fn update(
        &self,
        client_key: &str,
        key: &str,
        mut patch: ShortUrlPatch,
    ) -> Result<ShortUrl, AppError> {
        self.admit(client_key)?;

        if !patch.changes_destination() {
            return Err(AppError::bad_request(
                "No fields to update",
                json!({ "fields": ["original_url", "expires_at"] }),
            ));
        }

        if let Some(url) = patch.original_url.take() {
            patch.original_url = Some(sanitize_url(&url)?);
        }

        if let Some(Some(expires_at)) = patch.expires_at {
            ensure_future(expires_at)?;
        }

        let result = self.repository.update(key, patch).await;
        self.invalidate(key, result.as_ref().ok());

        let record = result?;
        info!(id = record.id, key = %key, "Short URL updated");
        Ok(record)
    }

    /// Deletes a record and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RateLimited`] if the client is over its limit.
    /// Returns [`AppError::NotFound`] if no record answers to `key`.
    pub async fn delete(&self, client_key: &str, key: &str) -> Result<ShortUrl, AppError> {
        self.admit(client_key)?;

        let result = self.repository.delete(key).await;
        self.invalidate(key, result.as_ref().ok().and_then(Option::as_ref));

        let record = result?.ok_or_else(|| not_found(key))?;
        info!(id = record.id, key = %key, "Short URL deleted");
        Ok(record)
    }

    /// Returns click statistics for a record, expired or not.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record answers to `key`.
    pub async fn stats(&self, key: &str) -> Result<UrlStats, AppError> {
        let record = self
            .repository
            .find_by_code_or_alias(key)
            .await?
            .ok_or_else(|| not_found(key))?;

        Ok(UrlStats {
            is_expired: record.is_expired(),
            record,
        })
    }

    pub async fn list(&self, limit: usize, offset: usize) -> Result<Vec<ShortUrl>, AppError> {
        self.repository.list(limit, offset).await
    }

    pub async fn count(&self) -> Result<u64, AppError> {
        self.repository.count().await
    }

    pub async fn summary(&self) -> Result<ServiceSummary, AppError> {
        Ok(ServiceSummary {
            total_urls: self.repository.count().await?,
            base_url: self.settings.base_url.clone(),
            cache: self.cache.stats(),
        })
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Zeroes the hit and miss counters without dropping entries.
    pub fn reset_cache_stats(&self) -> CacheStats {
        self.cache.reset_stats();
        self.cache.stats()
    }

    /// Builds the public short link for `key`.
    pub fn short_url(&self, key: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), key)
    }

    async fn assign_code(&self, id: i64) -> Result<ShortUrl, AppError> {
        let code = self.generator.generate(id).map_err(|e| {
            AppError::internal(
                "Failed to derive short code",
                json!({ "id": id, "reason": e.to_string() }),
            )
        })?;

        self.repository.assign_short_code(id, &code).await
    }

    async fn discard_draft(&self, id: i64) {
        if let Err(e) = self.repository.delete_by_id(id).await {
            warn!(id, error = %e, "Failed to discard draft short URL");
        }
    }

    fn cache_epoch(&self) -> u64 {
        *self.cache_epoch.lock()
    }

    /// Inserts `value` unless an invalidation happened since `epoch` was read.
    fn admit_to_cache(&self, key: &str, value: CachedUrl, epoch: u64) -> bool {
        let current = self.cache_epoch.lock();
        if *current != epoch {
            return false;
        }
        self.cache.set_url(key, value);
        true
    }

    fn invalidate(&self, key: &str, record: Option<&ShortUrl>) {
        let mut epoch = self.cache_epoch.lock();
        *epoch += 1;

        self.cache.invalidate(key);
        if let Some(record) = record {
            for k in record.lookup_keys() {
                self.cache.invalidate(k);
            }
        }
    }

    fn enqueue_click(&self, key: &str) {
        match self.clicks.try_send(ClickEvent::new(key)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(key = %key, "Click queue full, dropping click");
                counter!("click_events_dropped_total").increment(1);
            }
            Err(TrySendError::Closed(_)) => {
                warn!(key = %key, "Click worker stopped, dropping click");
                counter!("click_events_dropped_total").increment(1);
            }
        }
    }
}

fn ensure_future(expires_at: DateTime<Utc>) -> Result<(), AppError> {
    if expires_at <= Utc::now() {
        return Err(AppError::bad_request(
            "Expiration date must be in the future",
            json!({ "expires_at": expires_at }),
        ));
    }
    Ok(())
}

fn not_found(key: &str) -> AppError {
    AppError::not_found(
        format!("Short URL '{}' not found", key),
        json!({ "code": key }),
    )
}

fn gone(key: &str) -> AppError {
    AppError::gone(
        format!("Short URL '{}' has expired", key),
        json!({ "code": key }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;
    use crate::infrastructure::cache::{MemoryCache, NullCache};
    use crate::infrastructure::rate_limit::RateLimitConfig;
    use chrono::Duration as ChronoDuration;
    use std::time::Duration;

    struct Harness {
        service: UrlService,
        cache: Arc<MemoryCache>,
        clicks: mpsc::Receiver<ClickEvent>,
    }

    fn harness(repo: MockUrlRepository) -> Harness {
        harness_with(repo, RateLimitConfig::default())
    }

    fn harness_with(repo: MockUrlRepository, limits: RateLimitConfig) -> Harness {
        let cache = Arc::new(MemoryCache::new(100, Duration::from_secs(3600)));
        let (tx, rx) = mpsc::channel(16);
        let service = UrlService::new(
            Arc::new(repo),
            cache.clone(),
            Arc::new(RateLimiter::new(limits)),
            ShortCodeGenerator::default(),
            tx,
            UrlServiceSettings::default(),
        );

        Harness {
            service,
            cache,
            clicks: rx,
        }
    }

    fn record(id: i64, code: &str, url: &str) -> ShortUrl {
        let mut r = ShortUrl::new(id, url.to_string(), None, Utc::now(), None);
        r.short_code = Some(code.to_string());
        r
    }

    fn shorten_cmd(url: &str) -> ShortenCommand {
        ShortenCommand {
            original_url: url.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_shorten_encodes_storage_identity() {
        let mut repo = MockUrlRepository::new();
        repo.expect_create()
            .withf(|new_url| new_url.original_url == "https://example.com/page")
            .times(1)
            .returning(|new_url| {
                Ok(ShortUrl::new(
                    125,
                    new_url.original_url,
                    None,
                    Utc::now(),
                    None,
                ))
            });
        repo.expect_assign_short_code()
            .withf(|id, code| *id == 125 && code == "aaaacb")
            .times(1)
            .returning(|id, code| Ok(record(id, code, "https://example.com/page")));

        let h = harness(repo);
        let created = h
            .service
            .shorten("client", shorten_cmd("example.com/page"))
            .await
            .unwrap();

        assert_eq!(created.short_code.as_deref(), Some("aaaacb"));
        assert_eq!(h.service.short_url("aaaacb"), "http://localhost:3000/aaaacb");
    }

    #[tokio::test]
    async fn test_shorten_rejects_invalid_url_before_storage() {
        let repo = MockUrlRepository::new();
        let h = harness(repo);

        let err = h
            .service
            .shorten("client", shorten_cmd("javascript:alert(1)"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_shorten_rejects_reserved_alias() {
        let h = harness(MockUrlRepository::new());

        let err = h
            .service
            .shorten(
                "client",
                ShortenCommand {
                    original_url: "https://example.com".to_string(),
                    custom_alias: Some("admin".to_string()),
                    expires_at: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_shorten_rejects_past_expiry() {
        let h = harness(MockUrlRepository::new());

        let err = h
            .service
            .shorten(
                "client",
                ShortenCommand {
                    original_url: "https://example.com".to_string(),
                    custom_alias: None,
                    expires_at: Some(Utc::now() - ChronoDuration::hours(1)),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_shorten_propagates_alias_conflict() {
        let mut repo = MockUrlRepository::new();
        repo.expect_create()
            .returning(|_| Err(AppError::conflict("taken", json!({}))));
        repo.expect_assign_short_code().never();

        let h = harness(repo);
        let err = h
            .service
            .shorten(
                "client",
                ShortenCommand {
                    original_url: "https://example.com".to_string(),
                    custom_alias: Some("promo".to_string()),
                    expires_at: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_shorten_discards_draft_when_code_is_taken() {
        let mut repo = MockUrlRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|n| Ok(ShortUrl::new(2, n.original_url, None, Utc::now(), None)));
        repo.expect_assign_short_code()
            .times(1)
            .returning(|_, _| Err(AppError::conflict("taken", json!({}))));
        repo.expect_delete_by_id()
            .withf(|id| *id == 2)
            .times(1)
            .returning(|_| Ok(()));

        let h = harness(repo);
        let err = h
            .service
            .shorten("client", shorten_cmd("https://example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_shorten_reports_original_error_when_discard_fails() {
        let mut repo = MockUrlRepository::new();
        repo.expect_create()
            .returning(|n| Ok(ShortUrl::new(-1, n.original_url, None, Utc::now(), None)));
        repo.expect_assign_short_code().never();
        repo.expect_delete_by_id()
            .times(1)
            .returning(|_| Err(AppError::internal("storage down", json!({}))));

        let h = harness(repo);
        let err = h
            .service
            .shorten("client", shorten_cmd("https://example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to derive short code");
    }

    #[tokio::test]
    async fn test_shorten_evicts_stale_entry_under_new_code() {
        let mut repo = MockUrlRepository::new();
        repo.expect_create()
            .returning(|n| Ok(ShortUrl::new(125, n.original_url, None, Utc::now(), None)));
        repo.expect_assign_short_code()
            .returning(|id, code| Ok(record(id, code, "https://example.com/")));

        let h = harness(repo);
        h.cache
            .set_url("aaaacb", CachedUrl::new("https://alias.example/", None));

        h.service
            .shorten("client", shorten_cmd("https://example.com"))
            .await
            .unwrap();
        assert_eq!(h.cache.stats().size, 0);
    }

    #[tokio::test]
    async fn test_shorten_is_rate_limited() {
        let mut repo = MockUrlRepository::new();
        repo.expect_create()
            .times(2)
            .returning(|n| Ok(ShortUrl::new(1, n.original_url, None, Utc::now(), None)));
        repo.expect_assign_short_code()
            .times(2)
            .returning(|id, code| Ok(record(id, code, "https://example.com/")));

        let h = harness_with(
            repo,
            RateLimitConfig {
                capacity: 2,
                ..Default::default()
            },
        );

        for _ in 0..2 {
            h.service
                .shorten("client", shorten_cmd("https://example.com"))
                .await
                .unwrap();
        }

        let err = h
            .service
            .shorten("client", shorten_cmd("https://example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RateLimited { .. }));
        assert_eq!(h.service.rate_limit_status("client").remaining, 0);
        assert_eq!(h.service.rate_limit_status("other").remaining, 2);
    }

    #[tokio::test]
    async fn test_cold_keys_are_never_cached() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code_or_alias()
            .withf(|key| key == "aaaacb")
            .times(10)
            .returning(|_| Ok(Some(record(125, "aaaacb", "https://example.com/"))));

        let mut count = 0;
        repo.expect_increment_clicks()
            .times(10)
            .returning(move |_| {
                count += 1;
                Ok(count)
            });

        let mut h = harness(repo);

        for _ in 0..9 {
            let resolved = h.service.resolve("aaaacb").await.unwrap();
            assert!(!resolved.from_cache);
            assert_eq!(h.cache.stats().size, 0);
        }

        let tenth = h.service.resolve("aaaacb").await.unwrap();
        assert!(!tenth.from_cache);
        assert_eq!(h.cache.stats().size, 1);

        let hit = h.service.resolve("aaaacb").await.unwrap();
        assert!(hit.from_cache);
        assert_eq!(hit.destination, "https://example.com/");
        assert_eq!(h.clicks.try_recv().unwrap(), ClickEvent::new("aaaacb"));
    }

    #[tokio::test]
    async fn test_resolve_missing_is_not_found() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code_or_alias().returning(|_| Ok(None));
        repo.expect_increment_clicks().never();

        let h = harness(repo);
        let err = h.service.resolve("nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_expired_is_gone() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code_or_alias().returning(|_| {
            let mut r = record(1, "aaaaab", "https://example.com/");
            r.expires_at = Some(Utc::now() - ChronoDuration::minutes(1));
            Ok(Some(r))
        });
        repo.expect_increment_clicks().never();

        let h = harness(repo);
        let err = h.service.resolve("aaaaab").await.unwrap_err();
        assert!(matches!(err, AppError::Gone { .. }));
    }

    #[tokio::test]
    async fn test_cached_expired_entry_is_gone_and_evicted() {
        let h = harness(MockUrlRepository::new());
        h.cache.set_url(
            "aaaaab",
            CachedUrl::new(
                "https://example.com/",
                Some(Utc::now() - ChronoDuration::seconds(1)),
            ),
        );

        let err = h.service.resolve("aaaaab").await.unwrap_err();
        assert!(matches!(err, AppError::Gone { .. }));
        assert_eq!(h.cache.stats().size, 0);
    }

    #[tokio::test]
    async fn test_full_click_queue_drops_events() {
        let cache = Arc::new(MemoryCache::new(10, Duration::from_secs(60)));
        let (tx, mut rx) = mpsc::channel(1);
        let service = UrlService::new(
            Arc::new(MockUrlRepository::new()),
            cache.clone(),
            Arc::new(RateLimiter::default()),
            ShortCodeGenerator::default(),
            tx,
            UrlServiceSettings::default(),
        );
        cache.set_url("hot", CachedUrl::new("https://example.com/", None));

        for _ in 0..3 {
            let resolved = service.resolve("hot").await.unwrap();
            assert!(resolved.from_cache);
        }

        // capacity 1: the first click was queued, the rest were dropped
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_update_invalidates_every_key() {
        let mut repo = MockUrlRepository::new();
        repo.expect_update()
            .withf(|key, patch| {
                key == "promo" && patch.original_url.as_deref() == Some("https://new.example/")
            })
            .times(1)
            .returning(|_, _| {
                let mut r = record(1, "aaaaab", "https://new.example/");
                r.custom_alias = Some("promo".to_string());
                Ok(r)
            });

        let h = harness(repo);
        h.cache
            .set_url("aaaaab", CachedUrl::new("https://old.example/", None));
        h.cache
            .set_url("promo", CachedUrl::new("https://old.example/", None));

        let updated = h
            .service
            .update(
                "client",
                "promo",
                ShortUrlPatch {
                    original_url: Some("new.example".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.original_url, "https://new.example/");
        assert_eq!(h.cache.stats().size, 0);
    }

    #[tokio::test]
    async fn test_admission_skipped_after_concurrent_update() {
        let mut repo = MockUrlRepository::new();
        repo.expect_update()
            .returning(|_, _| Ok(record(1, "aaaaab", "https://new.example/")));

        let h = harness(repo);

        // a miss read storage before the update landed
        let epoch = h.service.cache_epoch();
        h.service
            .update(
                "client",
                "aaaaab",
                ShortUrlPatch {
                    original_url: Some("new.example".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let stale = CachedUrl::new("https://old.example/", None);
        assert!(!h.service.admit_to_cache("aaaaab", stale, epoch));
        assert_eq!(h.cache.stats().size, 0);

        let fresh = CachedUrl::new("https://new.example/", None);
        assert!(h.service.admit_to_cache("aaaaab", fresh, h.service.cache_epoch()));
        assert_eq!(h.cache.stats().size, 1);
    }

    #[tokio::test]
    async fn test_update_rejects_empty_patch() {
        let mut repo = MockUrlRepository::new();
        repo.expect_update().never();

        let h = harness(repo);
        let err = h
            .service
            .update("client", "aaaaab", ShortUrlPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_delete_invalidates_and_reports_missing() {
        let mut repo = MockUrlRepository::new();
        repo.expect_delete()
            .withf(|key| key == "aaaaab")
            .times(1)
            .returning(|_| Ok(Some(record(1, "aaaaab", "https://example.com/"))));
        repo.expect_delete()
            .withf(|key| key == "nope")
            .times(1)
            .returning(|_| Ok(None));

        let h = harness(repo);
        h.cache
            .set_url("aaaaab", CachedUrl::new("https://example.com/", None));
        h.cache
            .set_url("nope", CachedUrl::new("https://stale.example/", None));

        let deleted = h.service.delete("client", "aaaaab").await.unwrap();
        assert_eq!(deleted.id, 1);

        let err = h.service.delete("client", "nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
        assert_eq!(h.cache.stats().size, 0);
    }

    #[tokio::test]
    async fn test_stats_reports_expired_records() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code_or_alias().returning(|_| {
            let mut r = record(1, "aaaaab", "https://example.com/");
            r.click_count = 42;
            r.expires_at = Some(Utc::now() - ChronoDuration::days(1));
            Ok(Some(r))
        });

        let h = harness(repo);
        let stats = h.service.stats("aaaaab").await.unwrap();
        assert!(stats.is_expired);
        assert_eq!(stats.record.click_count, 42);
    }

    #[tokio::test]
    async fn test_summary() {
        let mut repo = MockUrlRepository::new();
        repo.expect_count().returning(|| Ok(7));

        let h = harness(repo);
        let summary = h.service.summary().await.unwrap();
        assert_eq!(summary.total_urls, 7);
        assert_eq!(summary.base_url, "http://localhost:3000");
        assert_eq!(summary.cache.max_size, 100);
    }

    #[tokio::test]
    async fn test_disabled_cache_always_reads_storage() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code_or_alias()
            .times(12)
            .returning(|_| Ok(Some(record(1, "aaaaab", "https://example.com/"))));
        repo.expect_increment_clicks().times(12).returning(|_| Ok(50));

        let (tx, _rx) = mpsc::channel(16);
        let service = UrlService::new(
            Arc::new(repo),
            Arc::new(NullCache::new()),
            Arc::new(RateLimiter::default()),
            ShortCodeGenerator::default(),
            tx,
            UrlServiceSettings::default(),
        );

        for _ in 0..12 {
            assert!(!service.resolve("aaaaab").await.unwrap().from_cache);
        }
        assert!(!service.cache_enabled());
    }
}
