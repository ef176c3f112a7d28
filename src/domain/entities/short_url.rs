//! Short URL entity representing a code-to-destination mapping.

use chrono::{DateTime, Utc};

/// A shortened URL record as owned by storage.
///
/// `short_code` is derived from `id` and is `None` only between the draft
/// insert and the code write-back during creation. A record can be reached by
/// its short code or, when present, by its custom alias.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortUrl {
    pub id: i64,
    pub short_code: Option<String>,
    pub custom_alias: Option<String>,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: u64,
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl ShortUrl {
    /// Creates a fresh record with no clicks and no derived code.
    pub fn new(
        id: i64,
        original_url: String,
        custom_alias: Option<String>,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            short_code: None,
            custom_alias,
            original_url,
            created_at,
            expires_at,
            click_count: 0,
            last_accessed_at: None,
        }
    }

    /// Returns true if the record has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now >= e)
    }

    /// The key to advertise externally: the custom alias when set, otherwise
    /// the derived code.
    pub fn public_key(&self) -> Option<&str> {
        self.custom_alias.as_deref().or(self.short_code.as_deref())
    }

    /// Every key under which this record may sit in the cache.
    pub fn lookup_keys(&self) -> impl Iterator<Item = &str> {
        self.short_code
            .as_deref()
            .into_iter()
            .chain(self.custom_alias.as_deref())
    }
}

/// Input data for creating a new record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShortUrl {
    pub original_url: String,
    pub custom_alias: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial update for an existing record.
///
/// `None` fields are left unchanged.
/// `expires_at: Some(None)` clears the expiry; `Some(Some(t))` sets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShortUrlPatch {
    pub original_url: Option<String>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl ShortUrlPatch {
    /// Returns true if applying the patch could change the redirect target.
    pub fn changes_destination(&self) -> bool {
        self.original_url.is_some() || self.expires_at.is_some()
    }
}
