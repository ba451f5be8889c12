//! Error types for the signage manager client

/// Result type alias for manager API operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the signage manager.
///
/// Every variant is a soft failure from the agent's point of view:
/// callers log it and retry on the next cycle with state preserved.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed (timeout, connection refused, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// API returned a non-success status
    #[error("API error: {0}")]
    ApiError(String),

    /// API returned a 2xx with an empty body
    #[error("Empty response from {0}")]
    EmptyBody(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an API error
    pub fn api_error(msg: impl Into<String>) -> Self {
        Self::ApiError(msg.into())
    }
}
