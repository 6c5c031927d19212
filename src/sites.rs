//! # Site List Module
//!
//! The operator-authored list of tool sites to crawl. Each entry carries the
//! static catalog fields (slug, tags, recommendation level, cost scores) that
//! are merged with the crawled metadata at upsert time.
//!
//! The list is a JSON array in camelCase, e.g.
//!
//! ```json
//! [{ "url": "https://www.logocook.shop/", "slug": "logocook",
//!    "tags": ["ai-design"], "level": "recommend", "learnCost": 1 }]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

use crate::error::Error as CrateError;

/// Default site list path, relative to the working directory
pub const DEFAULT_SITES_FILE: &str = "sites.json";

/// Lowest and highest allowed cost score
pub const SCORE_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Error type for loading the site list
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read site list {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse site list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate slug: {0}")]
    DuplicateSlug(String),

    #[error("Site {0} has an empty slug")]
    EmptySlug(String),

    #[error("Invalid URL for {slug}: {url}")]
    InvalidUrl { slug: String, url: String },

    #[error("{field} for {slug} must be between 1 and 5, got {value}")]
    ScoreOutOfRange {
        slug: String,
        field: &'static str,
        value: u8,
    },
}

impl From<ConfigError> for CrateError {
    fn from(err: ConfigError) -> Self {
        CrateError::Config(err.to_string())
    }
}

/// Recommendation level shown on the tool page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Level {
    #[default]
    Recommend,
    Alternative,
    NotRecommend,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Recommend => "recommend",
            Level::Alternative => "alternative",
            Level::NotRecommend => "notRecommend",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recommend" => Ok(Level::Recommend),
            "alternative" => Ok(Level::Alternative),
            "notRecommend" => Ok(Level::NotRecommend),
            other => Err(format!("unknown level: {}", other)),
        }
    }
}

fn default_score() -> u8 {
    3
}

/// One site to crawl, with its static catalog fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    /// Homepage to fetch
    pub url: String,

    /// Stable unique identifier; the catalog key
    pub slug: String,

    /// Display category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Tag keys, resolved to catalog tag ids at upsert time
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub level: Level,

    #[serde(default)]
    pub level_reason: String,

    /// Learning cost, 1-5
    #[serde(default = "default_score")]
    pub learn_cost: u8,

    /// Failure probability, 1-5
    #[serde(default = "default_score")]
    pub fail_rate: u8,

    /// Time cost, 1-5
    #[serde(default = "default_score")]
    pub time_cost: u8,
}

impl SiteConfig {
    /// A config with only a URL and slug; everything else defaulted
    pub fn new(url: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            slug: slug.into(),
            category: None,
            tags: Vec::new(),
            level: Level::default(),
            level_reason: String::new(),
            learn_cost: default_score(),
            fail_rate: default_score(),
            time_cost: default_score(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.slug.trim().is_empty() {
            return Err(ConfigError::EmptySlug(self.url.clone()));
        }
        if Url::parse(&self.url).is_err() {
            return Err(ConfigError::InvalidUrl {
                slug: self.slug.clone(),
                url: self.url.clone(),
            });
        }
        for (field, value) in [
            ("learnCost", self.learn_cost),
            ("failRate", self.fail_rate),
            ("timeCost", self.time_cost),
        ] {
            if !SCORE_RANGE.contains(&value) {
                return Err(ConfigError::ScoreOutOfRange {
                    slug: self.slug.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Parse and validate a site list from JSON text
pub fn parse_sites(json: &str) -> Result<Vec<SiteConfig>, ConfigError> {
    let sites: Vec<SiteConfig> = serde_json::from_str(json)?;
    validate_sites(&sites)?;
    Ok(sites)
}

/// Check every entry and that slugs are unique across the list
pub fn validate_sites(sites: &[SiteConfig]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for site in sites {
        site.validate()?;
        if !seen.insert(site.slug.as_str()) {
            return Err(ConfigError::DuplicateSlug(site.slug.clone()));
        }
    }
    Ok(())
}

/// Load the site list from a JSON file
pub async fn load_sites(path: impl AsRef<Path>) -> Result<Vec<SiteConfig>, ConfigError> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
    parse_sites(&json)
}
