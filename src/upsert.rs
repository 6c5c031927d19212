//! # Catalog Upsert Module
//!
//! Writes crawl records into a [`CatalogStore`], keyed by slug. Tag keys are
//! resolved against the tags already persisted; unknown keys are dropped.
//! A failure on one entry is logged and counted, and the run moves on.

use std::collections::HashMap;

use tracing::{error, info, instrument};

use crate::catalog::{CatalogEntry, CatalogError, CatalogStore, TagRef};
use crate::pipeline::CrawlRecord;

/// What happened to one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
    Failed(String),
}

/// Per-slug outcomes of an upsert run, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpsertReport {
    pub outcomes: Vec<(String, UpsertOutcome)>,
}

impl UpsertReport {
    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, UpsertOutcome::Created))
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, UpsertOutcome::Updated))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, UpsertOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&UpsertOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Map tag keys to ids, in key order, dropping keys with no persisted tag
pub fn resolve_tag_ids(keys: &[String], tag_map: &HashMap<String, String>) -> Vec<String> {
    keys.iter()
        .filter_map(|key| tag_map.get(key).cloned())
        .collect()
}

fn tag_map(tags: Vec<TagRef>) -> HashMap<String, String> {
    tags.into_iter().map(|tag| (tag.key, tag.id)).collect()
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// The description to store: generated summary, then page description,
/// then the operator's level reason
pub fn stored_description(record: &CrawlRecord) -> String {
    [
        record.info.ai_description.as_deref().unwrap_or_default(),
        record.info.description.as_str(),
        record.config.level_reason.as_str(),
    ]
    .into_iter()
    .find(|candidate| !candidate.is_empty())
    .unwrap_or_default()
    .to_string()
}

/// Build the catalog entry for a record
pub fn build_entry(record: &CrawlRecord, tag_ids: Vec<String>) -> CatalogEntry {
    let info = &record.info;
    let config = &record.config;

    let name = if info.name.is_empty() {
        config.slug.clone()
    } else {
        info.name.clone()
    };

    CatalogEntry {
        slug: config.slug.clone(),
        name,
        description: stored_description(record),
        url: config.url.clone(),
        logo: non_empty(&info.icon),
        title: non_empty(&info.title),
        keywords: non_empty(&info.keywords),
        og_image: info.og_image.clone(),
        level: config.level,
        level_reason: non_empty(&config.level_reason),
        learn_cost: config.learn_cost,
        fail_rate: config.fail_rate,
        time_cost: config.time_cost,
        tag_ids,
    }
}

async fn upsert_one<S: CatalogStore>(
    store: &S,
    entry: &CatalogEntry,
) -> Result<UpsertOutcome, CatalogError> {
    match store.find_entry_by_key(&entry.slug).await? {
        Some(_) => {
            store.update_entry(&entry.slug, entry).await?;
            Ok(UpsertOutcome::Updated)
        }
        None => {
            store.create_entry(entry).await?;
            Ok(UpsertOutcome::Created)
        }
    }
}

/// Create or update one catalog entry per record
///
/// Only the initial tag read is fatal. There is no atomicity across entries:
/// entries written before a failure stay written.
#[instrument(skip(store, records), fields(count = records.len()))]
pub async fn upsert_all<S: CatalogStore>(
    store: &S,
    records: &[CrawlRecord],
) -> Result<UpsertReport, CatalogError> {
    let tags = tag_map(store.find_tags_all().await?);
    info!("Resolving tags against {} persisted tags", tags.len());

    let mut report = UpsertReport::default();
    for record in records {
        let slug = record.config.slug.clone();
        let entry = build_entry(record, resolve_tag_ids(&record.config.tags, &tags));

        let outcome = match upsert_one(store, &entry).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Failed to upsert {}: {}", slug, e);
                UpsertOutcome::Failed(e.to_string())
            }
        };

        match &outcome {
            UpsertOutcome::Created => println!("  + created: {}", entry.name),
            UpsertOutcome::Updated => println!("  ↻ updated: {}", entry.name),
            UpsertOutcome::Failed(reason) => println!("  ✗ failed: {} ({})", entry.name, reason),
        }
        report.outcomes.push((slug, outcome));
    }

    info!(
        "Upsert finished: {} created, {} updated, {} failed",
        report.created(),
        report.updated(),
        report.failed()
    );
    Ok(report)
}
