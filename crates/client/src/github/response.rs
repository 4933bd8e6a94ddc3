//! Cache list response types.

use serde::Deserialize;
use sweeper_core::CacheEntry;

/// Body of `GET /repos/{owner}/{repo}/actions/caches`.
#[derive(Debug, Deserialize)]
pub struct CacheListResponse {
    #[serde(default)]
    pub total_count: u64,

    #[serde(default)]
    pub actions_caches: Vec<CacheEntry>,
}

impl CacheListResponse {
    /// Number of entries on this page.
    pub fn result_count(&self) -> usize {
        self.actions_caches.len()
    }
}

/// Error body returned by the REST API.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}
