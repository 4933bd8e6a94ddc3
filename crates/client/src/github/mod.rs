//! GitHub Actions cache API client.
//!
//! ### Endpoints
//!
//! - **List**: `GET {api}/repos/{owner}/{repo}/actions/caches?per_page=&page=`
//! - **Delete**: `DELETE {api}/repos/{owner}/{repo}/actions/caches/{cache_id}`
//! - **Authentication**: `Authorization: Bearer <token>`.
//! - **Versioning**: pinned with the `X-GitHub-Api-Version` header.
//!
//! No retries or rate limiting happen here; a failed call is returned to the
//! caller as is.

pub mod error;
pub mod request;
pub mod response;

pub use error::GithubError;
pub use request::CacheListRequest;
pub use response::CacheListResponse;

use reqwest::{Client, Response, header};
use std::time::Duration;
use sweeper_core::{CacheApi, CacheEntry, Repository, SweepConfig};
use url::Url;

use response::ApiErrorBody;

const ACCEPT: &str = "application/vnd.github+json";

const API_VERSION: &str = "2022-11-28";

/// GitHub client configuration.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub token: String,
    /// REST API root, e.g. https://api.github.com.
    pub base_url: String,
    pub repository: Repository,
    pub timeout: Duration,
    /// GitHub rejects requests without a User-Agent.
    pub user_agent: String,
}

impl From<&SweepConfig> for GithubConfig {
    fn from(config: &SweepConfig) -> Self {
        Self {
            token: config.token.clone(),
            base_url: config.api_url.clone(),
            repository: config.repository.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// GitHub Actions cache API client.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    base_url: Url,
    config: GithubConfig,
}

impl GithubClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GithubConfig) -> Result<Self, GithubError> {
        if config.token.is_empty() {
            return Err(GithubError::MissingToken);
        }

        let base_url = Url::parse(&config.base_url).map_err(|e| GithubError::InvalidBaseUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(GithubError::InvalidBaseUrl(config.base_url.clone()));
        }

        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        Ok(Self { http, base_url, config })
    }

    /// `{api}/repos/{owner}/{repo}/actions/caches[/{extra}]`
    fn caches_url(&self, extra: Option<&str>) -> Result<Url, GithubError> {
        let repository = &self.config.repository;
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| GithubError::InvalidBaseUrl(self.config.base_url.clone()))?;
            segments
                .pop_if_empty()
                .extend(["repos", repository.owner.as_str(), repository.name.as_str(), "actions", "caches"]);
            if let Some(extra) = extra {
                segments.push(extra);
            }
        }
        Ok(url)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(&self.config.token)
            .header(header::ACCEPT, ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    /// Map non-success responses to errors, using the API's `message` field
    /// when the body has one.
    async fn check_status(response: Response) -> Result<Response, GithubError> {
        let status = response.status();
        tracing::debug!("GitHub API response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let quota_exhausted = response
            .headers()
            .get("x-ratelimit-remaining")
            .is_some_and(|v| v.as_bytes() == b"0");

        let body = response.bytes().await.unwrap_or_default();
        let message = serde_json::from_slice::<ApiErrorBody>(&body)
            .map(|b| b.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());

        Err(match status.as_u16() {
            429 => GithubError::RateLimited(message),
            403 if quota_exhausted => GithubError::RateLimited(message),
            code @ (401 | 403) => GithubError::AuthError { status: code, message },
            code => GithubError::HttpError { status: code, message },
        })
    }

    /// Fetch one page of the repository's caches.
    pub async fn list_caches(&self, req: &CacheListRequest) -> Result<CacheListResponse, GithubError> {
        req.validate()?;

        let url = self.caches_url(None)?;
        tracing::debug!(page = req.page, per_page = req.per_page, "listing caches");

        let response = self.authorized(self.http.get(url)).query(req).send().await?;
        let response = Self::check_status(response).await?;

        let bytes = response.bytes().await?;
        let page: CacheListResponse = serde_json::from_slice(&bytes).map_err(|e| GithubError::Parse(e.to_string()))?;

        tracing::debug!(count = page.result_count(), total = page.total_count, "decoded cache page");
        Ok(page)
    }

    /// Delete a cache by id.
    pub async fn delete_cache(&self, cache_id: i64) -> Result<(), GithubError> {
        let url = self.caches_url(Some(&cache_id.to_string()))?;
        tracing::debug!(cache_id, "deleting cache");

        let response = self.authorized(self.http.delete(url)).send().await?;
        Self::check_status(response).await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl CacheApi for GithubClient {
    async fn list_cache_page(&self, page: u32, per_page: u32) -> Result<Vec<CacheEntry>, sweeper_core::Error> {
        let response = self.list_caches(&CacheListRequest::page(page, per_page)).await?;
        Ok(response.actions_caches)
    }

    async fn delete_cache_by_id(&self, id: i64) -> Result<(), sweeper_core::Error> {
        Ok(self.delete_cache(id).await?)
    }
}
