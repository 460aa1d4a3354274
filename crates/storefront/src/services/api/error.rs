//! Remote API error types.

use thiserror::Error;

/// Errors that can occur talking to the remote pet-shop API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("api returned {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    /// A successful HTTP response that signals a logical failure.
    ///
    /// This is terminal: no retry, no fallback. Callers surface it to the
    /// user as an inline error with a manual retry path.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The API answered 2xx but the payload failed validation.
    #[error("invalid payload from api: {0}")]
    Payload(#[from] wagtail_core::PayloadError),

    /// A URL for the request could not be built.
    #[error("invalid api url: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Whether this error is the remote saying "no such resource".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Status { status, .. } if *status == reqwest::StatusCode::NOT_FOUND
        )
    }
}
