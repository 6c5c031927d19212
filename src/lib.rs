//! # sitemeta - Tool Homepage Metadata Collector
//!
//! Fetches the homepages of a curated list of tools, extracts their metadata
//! (name, title, description, keywords, icon, social preview image) and writes
//! the result into a tool catalog.
//!
//! ## Features
//!
//! - Browser-like fetching with timeouts and bounded redirects
//! - Heuristic extraction that never fails on sparse or broken markup
//! - Optional one-sentence summaries from a rate-limited Gemini model
//! - Idempotent upsert into a libsql catalog, keyed by slug
//! - JSON results file written after every run
//!
//! ## Example
//!
//! ```rust,no_run
//! use sitemeta::crawler::{CrawlerConfig, Fetcher};
//! use sitemeta::pipeline::{crawl_all, format_summary};
//! use sitemeta::sites::load_sites;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sites = load_sites("sites.json").await?;
//!     let config = CrawlerConfig::default();
//!     let fetcher = Fetcher::new(&config)?;
//!
//!     for record in crawl_all(&fetcher, &sites, config.rate_limit()).await {
//!         println!("{}", format_summary(&record));
//!     }
//!     Ok(())
//! }
//! ```

mod error;

pub mod catalog;
pub mod crawler;
pub mod enrich;
pub mod model;
pub mod pipeline;
pub mod sites;
pub mod telemetry;
pub mod upsert;

pub use error::{Error, Result};
