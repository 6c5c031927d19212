//! Single-page fetching with browser headers, a timeout and bounded redirects

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client as ReqwestClient, redirect};
use tracing::{debug, instrument};
use url::Url;

use crate::crawler::CrawlerConfig;
use crate::crawler::error::CrawlError;

/// Raw result of a successful fetch
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: Url,

    /// Origin of the final URL, e.g. `https://example.com`
    pub origin: String,

    /// Response body
    pub body: String,
}

/// HTTP fetcher for tool homepages
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: ReqwestClient,
}

impl Fetcher {
    /// Create a fetcher from the crawler configuration
    pub fn new(config: &CrawlerConfig) -> Result<Self, CrawlError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value(&config.user_agent)?);
        headers.insert(ACCEPT, header_value(&config.accept)?);
        headers.insert(ACCEPT_LANGUAGE, header_value(&config.accept_language)?);

        let client = ReqwestClient::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .redirect(redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client })
    }

    /// Fetch a page and return its body and final origin
    ///
    /// Any transport failure or non-2xx status is returned as an error; the
    /// caller decides whether it is fatal.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, CrawlError> {
        let url = Url::parse(url)?;
        debug!("Sending GET request to {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(CrawlError::Status {
                status: status.as_u16(),
                url: final_url.to_string(),
            });
        }

        let origin = origin_of(&final_url)?;
        let body = response.text().await?;
        debug!("Fetched {} bytes from {}", body.len(), final_url);

        Ok(FetchedPage {
            url: final_url,
            origin,
            body,
        })
    }
}

/// Serialize the origin (scheme, host and non-default port) of a URL
pub fn origin_of(url: &Url) -> Result<String, CrawlError> {
    if url.host_str().is_none() {
        return Err(CrawlError::NoHost(url.to_string()));
    }
    Ok(url.origin().ascii_serialization())
}

fn header_value(value: &str) -> Result<HeaderValue, CrawlError> {
    HeaderValue::from_str(value).map_err(|_| CrawlError::InvalidHeader(value.to_string()))
}
