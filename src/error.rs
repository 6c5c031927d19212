//! Error types for the sitemeta crate

use thiserror::Error;

/// Result type for sitemeta operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sitemeta operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid site list
    #[error("Configuration error: {0}")]
    Config(String),

    /// Fetch or extraction error
    #[error("Crawl error: {0}")]
    Crawl(String),

    /// Catalog store error
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
