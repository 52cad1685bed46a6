//! Errors from the backend collaborators.

use thiserror::Error;

/// Result type alias for backend calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by [`ApiClient`](super::ApiClient) calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend rejected the request. `message` comes from the error body.
    #[error("{message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Message reported by the backend
        message: String,
    },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A success response lacked a required field.
    #[error("Backend response is missing `{0}`")]
    MissingField(&'static str),
}
