//! In-memory catalog store for tests
//!
//! Behaves like the database store (create fails on an existing slug, update
//! fails on a missing one) and can be told to fail specific operations.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use crate::catalog::{CatalogEntry, CatalogError, CatalogStore, TagRef};

#[derive(Debug, Default)]
pub struct MemoryCatalog {
    tags: Vec<TagRef>,
    entries: Mutex<BTreeMap<String, CatalogEntry>>,
    failing_slugs: HashSet<String>,
    fail_tag_read: bool,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persisted tags as `(id, key)` pairs
    pub fn with_tags(mut self, tags: &[(&str, &str)]) -> Self {
        self.tags = tags
            .iter()
            .map(|(id, key)| TagRef {
                id: id.to_string(),
                key: key.to_string(),
            })
            .collect();
        self
    }

    /// Every write for `slug` fails with a query error
    pub fn failing_on(mut self, slug: &str) -> Self {
        self.failing_slugs.insert(slug.to_string());
        self
    }

    /// The initial tag read fails, as if the store were unreachable
    pub fn unreachable(mut self) -> Self {
        self.fail_tag_read = true;
        self
    }

    pub fn entries(&self) -> BTreeMap<String, CatalogEntry> {
        self.entries.lock().unwrap().clone()
    }

    fn check_writable(&self, slug: &str) -> Result<(), CatalogError> {
        if self.failing_slugs.contains(slug) {
            return Err(CatalogError::Query(format!(
                "constraint violation for {}",
                slug
            )));
        }
        Ok(())
    }
}

impl CatalogStore for MemoryCatalog {
    async fn find_tags_all(&self) -> Result<Vec<TagRef>, CatalogError> {
        if self.fail_tag_read {
            return Err(CatalogError::Connection("store unreachable".to_string()));
        }
        Ok(self.tags.clone())
    }

    async fn find_entry_by_key(&self, slug: &str) -> Result<Option<CatalogEntry>, CatalogError> {
        Ok(self.entries.lock().unwrap().get(slug).cloned())
    }

    async fn create_entry(&self, entry: &CatalogEntry) -> Result<CatalogEntry, CatalogError> {
        self.check_writable(&entry.slug)?;
        let mut entries = self.entries.lock().unwrap();
        if entries.contains_key(&entry.slug) {
            return Err(CatalogError::Query(format!(
                "UNIQUE constraint failed: {}",
                entry.slug
            )));
        }
        entries.insert(entry.slug.clone(), entry.clone());
        Ok(entry.clone())
    }

    async fn update_entry(
        &self,
        slug: &str,
        entry: &CatalogEntry,
    ) -> Result<CatalogEntry, CatalogError> {
        self.check_writable(slug)?;
        let mut entries = self.entries.lock().unwrap();
        let stored = entries
            .get_mut(slug)
            .ok_or_else(|| CatalogError::NotFound(slug.to_string()))?;
        *stored = entry.clone();
        Ok(entry.clone())
    }
}
