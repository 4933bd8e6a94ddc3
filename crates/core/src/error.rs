//! Unified error types for cache-sweeper.

/// Errors surfaced by a sweep run.
///
/// API client errors are mapped into these so the workflow does not depend on
/// a particular HTTP stack.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote API rejected the credentials or lacks permission.
    #[error("AUTH_ERROR: {0}")]
    Auth(String),

    /// Rate limited by the remote API.
    #[error("RATE_LIMITED: {0}")]
    RateLimited(String),

    /// Non-success HTTP response.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Request timed out.
    #[error("TIMEOUT: {0}")]
    Timeout(String),

    /// Connection-level failure.
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// Response body could not be decoded.
    #[error("PARSE_ERROR: {0}")]
    Parse(String),

    /// Request could not be built (bad base URL, bad parameters).
    #[error("INVALID_REQUEST: {0}")]
    InvalidRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::HttpError("500 Internal Server Error".to_string());
        assert!(err.to_string().contains("HTTP_ERROR"));
        assert!(err.to_string().contains("500"));
    }
}
