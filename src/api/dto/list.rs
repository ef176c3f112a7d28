//! Query parameters and response for the list endpoint.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use super::url::UrlResponse;

pub const DEFAULT_LIMIT: usize = 100;
pub const MAX_LIMIT: usize = 1000;

/// `?limit=&offset=` for `GET /api/urls`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<usize>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub offset: Option<usize>,
}

impl ListQuery {
    /// Returns `(limit, offset)`.
    ///
    /// # Defaults
    ///
    /// - `limit`: 100, must be between 1 and 1000
    /// - `offset`: 0
    pub fn limit_offset(&self) -> Result<(usize, usize), String> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);

        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(format!("Limit must be between 1 and {MAX_LIMIT}"));
        }

        Ok((limit, self.offset.unwrap_or(0)))
    }
}

#[derive(Debug, Serialize)]
pub struct UrlListResponse {
    pub total: u64,
    pub limit: usize,
    pub offset: usize,
    pub items: Vec<UrlResponse>,
}
