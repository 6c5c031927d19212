//! Error types for the crawler module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Network failure: DNS, connect, timeout, too many redirects
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("Request failed with status code {status} for {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Final URL that produced the status
        url: String,
    },

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// The URL parsed but has no usable origin (e.g. `data:` or `file:` URLs)
    #[error("URL has no host: {0}")]
    NoHost(String),

    /// A configured header contains characters HTTP does not allow
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    /// Results file write error
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Results file serialization error
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<CrawlError> for CrateError {
    fn from(err: CrawlError) -> Self {
        match err {
            CrawlError::Network(e) => CrateError::Http(e),
            CrawlError::Storage(e) => CrateError::Io(e),
            CrawlError::Serialize(e) => CrateError::Json(e),
            _ => CrateError::Crawl(err.to_string()),
        }
    }
}
