//! Error taxonomy for the fleet API.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by [`ApiClient`](super::ApiClient) operations.
///
/// The taxonomy separates conditions with different handling: transport
/// failures are retried on the next poll cycle, 401 invalidates the stored
/// credential, 422 is surfaced to the caller of the mutation, and 404 renders
/// as an explicit empty state rather than an error banner.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or server unreachable (connect failure or timeout).
    #[error("server unreachable: {0}")]
    Unreachable(String),

    /// Credential invalid or expired (HTTP 401). The stored token has
    /// already been cleared when this is returned.
    #[error("authentication rejected")]
    Unauthorized,

    /// Create/update payload rejected by the server (HTTP 422).
    #[error("request rejected: {0}")]
    Validation(String),

    /// The requested machine does not exist (HTTP 404).
    #[error("machine not found")]
    NotFound,

    /// Any other non-success HTTP status.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failed to parse a response body.
    #[error("failed to parse response: {0}")]
    Parse(String),
}

impl ApiError {
    /// Map a non-success HTTP status to the matching error variant.
    pub(crate) fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::NOT_FOUND => ApiError::NotFound,
            StatusCode::UNPROCESSABLE_ENTITY => ApiError::Validation(body),
            _ => ApiError::Http(format!("server returned status {}", status)),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            ApiError::Unreachable(err.to_string())
        } else if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else {
            ApiError::Http(err.to_string())
        }
    }
}
