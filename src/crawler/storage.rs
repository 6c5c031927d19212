//! The JSON results file written after every run
//!
//! The file is an audit trail: it holds every collected record, failures
//! included, whether or not the run persisted anything to the catalog.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument};

use super::CrawlError;

/// Default results file name, relative to the working directory
pub const DEFAULT_RESULTS_FILE: &str = "crawl-results.json";

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Path of the results file
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_RESULTS_FILE),
        }
    }
}

/// Writer for the results file
#[derive(Debug, Clone, Default)]
pub struct Storage {
    config: StorageConfig,
}

impl Storage {
    /// Create a new storage with custom configuration
    pub fn with_config(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Path of the results file
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Write all records as a pretty-printed JSON array, replacing any
    /// previous file
    #[instrument(skip(self, records), fields(path = %self.config.path.display()))]
    pub async fn write<T: Serialize>(&self, records: &[T]) -> Result<(), CrawlError> {
        if let Some(parent) = self.config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(records)?;
        fs::write(&self.config.path, json).await?;
        debug!("Wrote {} records", records.len());
        Ok(())
    }
}
