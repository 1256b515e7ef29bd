//! Identity backend error types.

use thiserror::Error;

/// Errors raised by an [`IdentityBackend`](super::IdentityBackend).
#[derive(Error, Debug)]
pub enum BackendError {
    /// Backend returned a non-success status code.
    #[error("Identity backend request failed ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the backend.
        message: String,
    },

    /// Backend is unreachable (503 or connection failed).
    #[error("Identity backend is unavailable. Check your network connection or try again later.")]
    Unavailable,

    /// Request timed out.
    #[error("Request to the identity backend timed out.")]
    Timeout,

    /// Network error during HTTP request.
    #[error("Network error: {0}. Check your internet connection.")]
    Network(String),

    /// Response body could not be decoded.
    #[error("Identity backend returned malformed data: {0}")]
    Serialization(String),

    /// Endpoint URL could not be built.
    #[error("Invalid identity backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(format!("JSON error: {err}"))
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Unavailable
        } else if err.is_decode() {
            Self::Serialization(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<reqwest_middleware::Error> for BackendError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(inner) => inner.into(),
            other => Self::Network(other.to_string()),
        }
    }
}
