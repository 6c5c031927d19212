//! Tag definitions and seeding
//!
//! Site lists refer to tags by key. The upserter only resolves keys that are
//! already persisted, so a fresh catalog is seeded with [`DEFAULT_TAGS`] first.

use tracing::{info, instrument};

use crate::catalog::{CatalogError, Database};

/// A persisted tag with its display data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: String,
    pub key: String,
    pub name: String,
    pub color: Option<String>,
    pub sort_order: i64,
    pub is_active: bool,
}

/// A tag to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub key: String,
    pub name: String,
    pub color: Option<String>,
    pub sort_order: i64,
}

/// Default tag set as `(key, display name, color)`, in display order
pub const DEFAULT_TAGS: &[(&str, &str, &str)] = &[
    ("ai-coding", "AI 编程", "#8B5CF6"),
    ("ai-design", "AI 设计", "#EC4899"),
    ("ai-chat", "AI 对话", "#06B6D4"),
    ("code-editor", "代码编辑器", "#10B981"),
    ("frontend", "前端框架", "#3B82F6"),
    ("backend", "后端服务", "#F59E0B"),
    ("database", "数据库", "#EF4444"),
    ("deploy", "部署托管", "#14B8A6"),
    ("design", "设计工具", "#F472B6"),
    ("code-hosting", "代码托管", "#6366F1"),
    ("css", "CSS 框架", "#0EA5E9"),
    ("ui-generator", "UI 生成", "#A855F7"),
    ("free-tier", "免费额度", "#22C55E"),
    ("must-have", "必备工具", "#EF4444"),
    ("frontend-template", "前端模板", "#0EA5E9"),
    ("logo-generator", "Logo 生成", "#A855F7"),
    ("qr-code-generator", "二维码工具", "#22C55E"),
    ("operation-tool", "运营工具", "#EF4444"),
];

/// The default tags as insertable records; sort order follows list position
pub fn default_tags() -> Vec<NewTag> {
    DEFAULT_TAGS
        .iter()
        .enumerate()
        .map(|(position, (key, name, color))| NewTag {
            key: key.to_string(),
            name: name.to_string(),
            color: Some(color.to_string()),
            sort_order: position as i64,
        })
        .collect()
}

/// Outcome of a seeding run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Keys inserted by this run
    pub created: Vec<String>,

    /// Keys that already existed
    pub skipped: Vec<String>,
}

/// Insert every tag whose key is not yet persisted
///
/// Existing tags are left untouched, so running this twice is a no-op.
#[instrument(skip(db, tags), fields(count = tags.len()))]
pub async fn seed_tags(db: &Database, tags: &[NewTag]) -> Result<SeedReport, CatalogError> {
    let mut report = SeedReport::default();

    for tag in tags {
        if db.find_tag_by_key(&tag.key).await?.is_some() {
            println!("  - skipped: {} (exists)", tag.name);
            report.skipped.push(tag.key.clone());
        } else {
            db.create_tag(tag).await?;
            println!("  + created: {}", tag.name);
            report.created.push(tag.key.clone());
        }
    }

    info!(
        "Seeded tags: {} created, {} skipped",
        report.created.len(),
        report.skipped.len()
    );
    Ok(report)
}
