//! In-process implementation of the URL repository.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::sync::RwLock;

use crate::domain::entities::{NewShortUrl, ShortUrl, ShortUrlPatch};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

#[derive(Default)]
struct Store {
    records: BTreeMap<i64, ShortUrl>,
    by_code: HashMap<String, i64>,
    by_alias: HashMap<String, i64>,
    next_id: i64,
}

impl Store {
    fn resolve(&self, key: &str) -> Option<i64> {
        self.by_code
            .get(key)
            .or_else(|| self.by_alias.get(key))
            .copied()
    }

    fn is_taken(&self, key: &str) -> bool {
        self.by_code.contains_key(key) || self.by_alias.contains_key(key)
    }
}

fn not_found(key: &str) -> AppError {
    AppError::not_found(
        format!("Short URL '{}' not found", key),
        json!({ "code": key }),
    )
}

/// Repository keeping every record in process memory.
///
/// Identities are assigned monotonically starting from 1 (or from the value
/// given to [`MemoryUrlRepository::with_next_id`]). Short codes and custom
/// aliases live in separate indexes and a lookup checks the code index
/// first. A new alias may not collide with an alias or an issued code; a
/// derived code is never rejected because an alias happens to spell it.
/// Contents are lost when the process exits.
pub struct MemoryUrlRepository {
    store: RwLock<Store>,
}

impl MemoryUrlRepository {
    pub fn new() -> Self {
        Self::with_next_id(1)
    }

    /// Starts identity assignment at `next_id`.
    pub fn with_next_id(next_id: i64) -> Self {
        Self {
            store: RwLock::new(Store {
                next_id,
                ..Default::default()
            }),
        }
    }
}

impl Default for MemoryUrlRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let mut store = self.store.write().await;

        if let Some(alias) = new_url.custom_alias.as_deref()
            && store.is_taken(alias)
        {
            return Err(AppError::conflict(
                format!("Custom alias '{}' is already taken", alias),
                json!({ "alias": alias }),
            ));
        }

        let id = store.next_id;
        store.next_id += 1;

        let record = ShortUrl::new(
            id,
            new_url.original_url,
            new_url.custom_alias,
            Utc::now(),
            new_url.expires_at,
        );

        if let Some(alias) = &record.custom_alias {
            store.by_alias.insert(alias.clone(), id);
        }
        store.records.insert(id, record.clone());

        Ok(record)
    }

    async fn assign_short_code(&self, id: i64, short_code: &str) -> Result<ShortUrl, AppError> {
        let mut guard = self.store.write().await;
        let store = &mut *guard;

        if store
            .by_code
            .get(short_code)
            .is_some_and(|&owner| owner != id)
        {
            return Err(AppError::conflict(
                format!("Short code '{}' is already taken", short_code),
                json!({ "code": short_code }),
            ));
        }

        let Some(record) = store.records.get_mut(&id) else {
            return Err(AppError::not_found(
                format!("Short URL with id {} not found", id),
                json!({ "id": id }),
            ));
        };

        if let Some(previous) = record.short_code.replace(short_code.to_string())
            && previous != short_code
        {
            store.by_code.remove(&previous);
        }
        store.by_code.insert(short_code.to_string(), id);

        Ok(record.clone())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), AppError> {
        let mut store = self.store.write().await;
        let Some(record) = store.records.remove(&id) else {
            return Ok(());
        };

        if let Some(code) = &record.short_code
            && store.by_code.get(code) == Some(&id)
        {
            store.by_code.remove(code);
        }
        if let Some(alias) = &record.custom_alias {
            store.by_alias.remove(alias);
        }

        Ok(())
    }

    async fn find_by_code_or_alias(&self, key: &str) -> Result<Option<ShortUrl>, AppError> {
        let store = self.store.read().await;
        Ok(store
            .resolve(key)
            .and_then(|id| store.records.get(&id))
            .cloned())
    }

    async fn update(&self, key: &str, patch: ShortUrlPatch) -> Result<ShortUrl, AppError> {
        let mut store = self.store.write().await;
        let id = store.resolve(key).ok_or_else(|| not_found(key))?;
        let record = store.records.get_mut(&id).ok_or_else(|| not_found(key))?;

        if let Some(original_url) = patch.original_url {
            record.original_url = original_url;
        }
        if let Some(expires_at) = patch.expires_at {
            record.expires_at = expires_at;
        }

        Ok(record.clone())
    }

    async fn delete(&self, key: &str) -> Result<Option<ShortUrl>, AppError> {
        let mut store = self.store.write().await;
        let Some(id) = store.resolve(key) else {
            return Ok(None);
        };

        let removed = store.records.remove(&id);
        if let Some(record) = &removed {
            if let Some(code) = &record.short_code {
                store.by_code.remove(code);
            }
            if let Some(alias) = &record.custom_alias {
                store.by_alias.remove(alias);
            }
        }

        Ok(removed)
    }

    async fn increment_clicks(&self, key: &str) -> Result<u64, AppError> {
        let mut store = self.store.write().await;
        let id = store.resolve(key).ok_or_else(|| not_found(key))?;
        let record = store.records.get_mut(&id).ok_or_else(|| not_found(key))?;

        record.click_count += 1;
        record.last_accessed_at = Some(Utc::now());

        Ok(record.click_count)
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<ShortUrl>, AppError> {
        let store = self.store.read().await;
        Ok(store
            .records
            .values()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.store.read().await.records.len() as u64)
    }
}
