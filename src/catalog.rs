//! # Catalog Store Module
//!
//! The tool catalog that crawled sites are written into. The pipeline only
//! needs four operations, captured by [`CatalogStore`]; [`Database`] provides
//! them on top of a local libsql database.
//!
//! ## Key Components
//!
//! - `CatalogStore`: read all tags, find/create/update an entry by slug
//! - `CatalogEntry`: the stored shape of one tool
//! - `TagRef`: a tag key and its opaque persistent id
//! - `Database`: libsql-backed store; also seeds tags (see `tags`)

mod database;
pub mod error;
mod schema;
pub mod tags;

#[cfg(test)]
pub mod memory;

pub use database::Database;
pub use error::CatalogError;

use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::sites::Level;

/// A persisted tag key and its id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    /// Opaque persistent id
    pub id: String,

    /// Human-readable key used in the site list
    pub key: String,
}

/// A tool as stored in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub logo: Option<String>,
    pub title: Option<String>,
    pub keywords: Option<String>,
    pub og_image: Option<String>,
    pub level: Level,
    pub level_reason: Option<String>,
    pub learn_cost: u8,
    pub fail_rate: u8,
    pub time_cost: u8,

    /// Resolved tag ids, in site list order
    pub tag_ids: Vec<String>,
}

/// The catalog operations the pipeline depends on
pub trait CatalogStore {
    /// All persisted tags
    fn find_tags_all(&self) -> impl Future<Output = Result<Vec<TagRef>, CatalogError>> + Send;

    /// The entry stored under `slug`, if any
    fn find_entry_by_key(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Option<CatalogEntry>, CatalogError>> + Send;

    /// Insert a new entry; fails if the slug already exists
    fn create_entry(
        &self,
        entry: &CatalogEntry,
    ) -> impl Future<Output = Result<CatalogEntry, CatalogError>> + Send;

    /// Replace the entry stored under `slug`
    fn update_entry(
        &self,
        slug: &str,
        entry: &CatalogEntry,
    ) -> impl Future<Output = Result<CatalogEntry, CatalogError>> + Send;
}
