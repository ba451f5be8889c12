//! Error types for the asset cache

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while materializing an asset.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem error (cache dir creation, temp file, rename, ...)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Download request failed
    #[error("Download failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote answered with a non-success status
    #[error("Download of {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Filename would escape the cache root
    #[error("Invalid cache filename: {0}")]
    InvalidFilename(String),
}
