//! # Site Crawler Module
//!
//! Fetches a tool's homepage and turns its markup into a [`SiteInfo`]. This is
//! the first stage of the pipeline; its output feeds the enricher and the
//! catalog upsert.
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: request timeout, redirect bound, browser headers, pacing
//! - `Fetcher`: one GET per site, non-2xx treated as failure
//! - `extract_site_info`: title/description/keywords, site name, icon and
//!   social image, each with its own fallback chain
//! - `storage`: the JSON results file written after every run
//!
//! Only the page itself is fetched. There is no link discovery, no robots.txt
//! handling and no JavaScript execution.

mod config;
mod content_extraction;
mod error;
mod fetch;
pub mod storage;

pub use config::{CrawlerConfig, CrawlerConfigBuilder};
pub use content_extraction::{extract_site_info, resolve_icon_href, resolve_og_image};
pub use error::CrawlError;
pub use fetch::{FetchedPage, Fetcher, origin_of};

use serde::{Deserialize, Serialize};

/// Metadata extracted from a site's homepage
///
/// `name`, `description`, `icon`, `title` and `keywords` are always present
/// (possibly empty). The optional fields are omitted from JSON when absent so
/// that "no image" stays distinguishable from "empty image".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfo {
    /// URL that was requested
    pub url: String,

    /// Human-readable site name
    pub name: String,

    /// Meta description
    pub description: String,

    /// Absolute icon URL
    pub icon: String,

    /// Absolute or verbatim social preview image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,

    /// Fetch error message, set only when the fetch failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Page title
    pub title: String,

    /// Meta keywords
    pub keywords: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_site_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_title: Option<String>,

    /// Generated summary, set by the enricher
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_description: Option<String>,
}

impl SiteInfo {
    /// An empty record for `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// The degraded record used when fetching `url` failed
    pub fn failed(url: impl Into<String>, slug: &str, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: slug.to_string(),
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Whether the page was fetched and extracted
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Whether any of title, description or keywords carries text
    pub fn has_tdk(&self) -> bool {
        [&self.title, &self.description, &self.keywords]
            .iter()
            .any(|field| !field.trim().is_empty())
    }
}
