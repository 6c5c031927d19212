//! # Catalog Schema Module
//!
//! Creates the two catalog tables if they do not exist:
//! 1. `tool_tags` - tag keys with their opaque ids and display data
//! 2. `tools` - one row per tool, keyed by slug, tag ids stored as a JSON array
//!
//! The CHECK constraints mirror the site list validation so that a record
//! that slipped past it is rejected by the store instead of stored.

use crate::catalog::error::CatalogError;
use libsql::{Connection, params};

/// Initialize the database schema
pub async fn initialize_schema(conn: &Connection) -> Result<(), CatalogError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS tool_tags (
            id TEXT PRIMARY KEY,
            key TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            color TEXT,
            sort_order INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1
        )",
        params![],
    )
    .await
    .map_err(|e| CatalogError::Schema(format!("Failed to create tool_tags table: {}", e)))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS tools (
            slug TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            url TEXT NOT NULL,
            logo TEXT,
            title TEXT,
            keywords TEXT,
            og_image TEXT,
            level TEXT NOT NULL DEFAULT 'recommend'
                CHECK (level IN ('recommend', 'alternative', 'notRecommend')),
            level_reason TEXT,
            learn_cost INTEGER NOT NULL DEFAULT 3 CHECK (learn_cost BETWEEN 1 AND 5),
            fail_rate INTEGER NOT NULL DEFAULT 3 CHECK (fail_rate BETWEEN 1 AND 5),
            time_cost INTEGER NOT NULL DEFAULT 3 CHECK (time_cost BETWEEN 1 AND 5),
            tag_ids TEXT NOT NULL DEFAULT '[]'
        )",
        params![],
    )
    .await
    .map_err(|e| CatalogError::Schema(format!("Failed to create tools table: {}", e)))?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_tool_tags_sort_order ON tool_tags(sort_order)",
        params![],
    )
    .await
    .map_err(|e| CatalogError::Schema(format!("Failed to create index on tool_tags: {}", e)))?;

    Ok(())
}
