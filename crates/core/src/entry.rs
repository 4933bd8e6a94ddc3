//! Remote cache entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One record from the remote cache store.
///
/// Field names follow the `actions_caches` items of the GitHub Actions cache
/// API. Every field is optional because the API schema marks them so.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default)]
    pub key: Option<String>,

    /// Git ref the cache was created for (e.g. `refs/heads/main`).
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub size_in_bytes: Option<u64>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    /// Build an entry carrying only an id and a key.
    pub fn new(id: Option<i64>, key: impl Into<String>) -> Self {
        Self { id, key: Some(key.into()), ..Default::default() }
    }

    /// Whether this entry's key is exactly `key`.
    pub fn matches_key(&self, key: &str) -> bool {
        self.key.as_deref() == Some(key)
    }

    /// Id to pass to the delete endpoint, if the entry is deletable at all.
    pub fn deletable_id(&self) -> Option<i64> {
        self.id
    }
}
