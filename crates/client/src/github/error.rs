//! GitHub API client error types.

use std::sync::Arc;

/// Errors from the GitHub Actions cache API client.
#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    /// Missing API token.
    #[error("missing API token")]
    MissingToken,

    /// API root could not be parsed or cannot carry a path.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Invalid pagination parameter.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed or the token lacks permission.
    #[error("authentication failed ({status}): {message}")]
    AuthError { status: u16, message: String },

    /// Rate limited by the GitHub API.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// HTTP error response.
    #[error("HTTP error: {status} {message}")]
    HttpError { status: u16, message: String },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for GithubError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { GithubError::Timeout } else { GithubError::Network(Arc::new(err)) }
    }
}

impl From<GithubError> for sweeper_core::Error {
    /// Keeps only the detail; the core variant supplies the error code.
    fn from(err: GithubError) -> Self {
        use sweeper_core::Error;

        match err {
            GithubError::MissingToken => Error::Auth("missing API token".to_string()),
            GithubError::AuthError { status, message } => Error::Auth(format!("{status} {message}")),
            GithubError::InvalidBaseUrl(url) => Error::InvalidRequest(format!("invalid base URL: {url}")),
            GithubError::InvalidRequest(msg) => Error::InvalidRequest(msg),
            GithubError::RateLimited(msg) => Error::RateLimited(msg),
            GithubError::HttpError { status, message } => Error::HttpError(format!("{status} {message}")),
            GithubError::Timeout => Error::Timeout("request timed out".to_string()),
            GithubError::Network(e) => Error::Network(e.to_string()),
            GithubError::Parse(msg) => Error::Parse(msg),
        }
    }
}
