//! Cache list request parameters and validation.

use serde::Serialize;

use crate::github::GithubError;

/// Largest page size the list endpoint accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Query parameters for `GET /repos/{owner}/{repo}/actions/caches`.
///
/// https://docs.github.com/en/rest/actions/cache#list-github-actions-caches-for-a-repository
#[derive(Debug, Clone, Serialize)]
pub struct CacheListRequest {
    /// Results per page (1-100).
    pub per_page: u32,

    /// Page number, starting at 1.
    pub page: u32,
}

impl CacheListRequest {
    pub fn page(page: u32, per_page: u32) -> Self {
        Self { per_page, page }
    }

    /// Validate the pagination parameters.
    pub fn validate(&self) -> Result<(), GithubError> {
        if !(1..=MAX_PER_PAGE).contains(&self.per_page) {
            return Err(GithubError::InvalidRequest(format!(
                "per_page must be 1-{MAX_PER_PAGE}, got {}",
                self.per_page
            )));
        }

        if self.page == 0 {
            return Err(GithubError::InvalidRequest("page must be at least 1".to_string()));
        }

        Ok(())
    }
}
