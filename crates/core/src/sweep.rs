//! The sweep workflow: enumerate remote cache entries, optionally delete one.
//!
//! Pages are fetched strictly one after another. Listing gives up after
//! [`MAX_PAGES`] round trips even if the backend never returns an empty page.

use crate::{CacheEntry, Error, Reporter, SweepConfig};

/// Entries requested per list call.
pub const PAGE_SIZE: u32 = 100;

/// Upper bound on list calls per run.
pub const MAX_PAGES: u32 = 100;

/// Remote cache store operations the sweep needs.
#[async_trait::async_trait]
pub trait CacheApi: Send + Sync {
    /// Fetch one page of entries. Pages are numbered from 1.
    async fn list_cache_page(&self, page: u32, per_page: u32) -> Result<Vec<CacheEntry>, Error>;

    /// Delete the entry with the given id.
    async fn delete_cache_by_id(&self, id: i64) -> Result<(), Error>;
}

/// What happened in the delete phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// No `cache_key` was supplied.
    Skipped,
    Deleted { id: i64 },
    /// No entry has the key, or the matching entry has no id.
    NotFound,
    Failed { id: i64, error: String },
}

/// Result of a sweep run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepSummary {
    pub listed: usize,
    pub pages: u32,
    pub outcome: DeleteOutcome,
}

/// Entries gathered by [`list_all`] plus the number of list calls made.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub entries: Vec<CacheEntry>,
    pub pages: u32,
}

/// Page through the whole store.
///
/// Stops at the first empty page or after [`MAX_PAGES`] pages, whichever comes
/// first. Entries keep the order the API returned them in.
///
/// # Errors
///
/// Any list-call error is returned as is; entries gathered so far are dropped.
pub async fn list_all<A: CacheApi + ?Sized>(api: &A) -> Result<Listing, Error> {
    let mut listing = Listing::default();

    for page in 1..=MAX_PAGES {
        let entries = api.list_cache_page(page, PAGE_SIZE).await?;
        listing.pages = page;

        tracing::debug!(page, count = entries.len(), "fetched cache page");

        if entries.is_empty() {
            return Ok(listing);
        }

        listing.entries.extend(entries);
    }

    tracing::warn!(pages = MAX_PAGES, "stopped listing at page limit");
    Ok(listing)
}

/// Delete the first entry whose key is exactly `key`.
///
/// A delete failure is reported and marks the run failed, but is not returned
/// as an error. No retries.
pub async fn find_and_delete<A, R>(api: &A, reporter: &mut R, entries: &[CacheEntry], key: &str) -> DeleteOutcome
where
    A: CacheApi + ?Sized,
    R: Reporter + ?Sized,
{
    let Some(id) = entries.iter().find(|entry| entry.matches_key(key)).and_then(CacheEntry::deletable_id) else {
        reporter.warning(&format!("No cache found with key {key}."));
        return DeleteOutcome::NotFound;
    };

    tracing::debug!(id, key, "deleting cache");

    match api.delete_cache_by_id(id).await {
        Ok(()) => {
            reporter.info(&format!("Cache with key {key} deleted successfully."));
            DeleteOutcome::Deleted { id }
        }
        Err(e) => {
            tracing::error!(id, key, error = %e, "cache delete failed");
            reporter.set_failed(&format!("Failed to delete cache {key};\n\n{e}"));
            DeleteOutcome::Failed { id, error: e.to_string() }
        }
    }
}

/// Run one sweep with validated settings.
///
/// # Errors
///
/// Returns the error of a failed list call. Delete failures go to `reporter`.
pub async fn run<A, R>(api: &A, reporter: &mut R, config: &SweepConfig) -> Result<SweepSummary, Error>
where
    A: CacheApi + ?Sized,
    R: Reporter + ?Sized,
{
    let listing = list_all(api).await?;

    if config.debug {
        reporter.log(&format!("Found {} caches", listing.entries.len()));
    }

    let outcome = match config.cache_key.as_deref() {
        Some(key) => find_and_delete(api, reporter, &listing.entries, key).await,
        None => {
            if config.debug {
                reporter.log("No cache key specified. Skipping cache deletion.");
            }
            DeleteOutcome::Skipped
        }
    };

    Ok(SweepSummary { listed: listing.entries.len(), pages: listing.pages, outcome })
}
