//! Database operations for the catalog module

use crate::catalog::error::CatalogError;
use crate::catalog::schema;
use crate::catalog::tags::{NewTag, Tag};
use crate::catalog::{CatalogEntry, CatalogStore, TagRef};
use crate::sites::Level;
use libsql::{Connection, Row, params};
use tracing::{debug, instrument};

const ENTRY_COLUMNS: &str = "slug, name, description, url, logo, title, keywords, og_image, \
     level, level_reason, learn_cost, fail_rate, time_cost, tag_ids";

/// libsql-backed catalog store
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new database manager
    #[instrument(skip(conn))]
    pub async fn new(conn: Connection) -> Result<Self, CatalogError> {
        schema::initialize_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Open (or create) a local database file
    pub async fn new_from_path(path: &str) -> Result<Self, CatalogError> {
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| CatalogError::Connection(format!("Failed to open database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| CatalogError::Connection(format!("Failed to connect to database: {}", e)))?;

        Self::new(conn).await
    }

    /// All tags with their display data, in sort order
    pub async fn list_tags(&self) -> Result<Vec<Tag>, CatalogError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, key, name, color, sort_order, is_active
                 FROM tool_tags
                 ORDER BY sort_order, key",
                params![],
            )
            .await
            .map_err(|e| CatalogError::Query(format!("Failed to list tags: {}", e)))?;

        let mut tags = Vec::new();
        while let Some(row) = rows.next().await? {
            tags.push(Tag {
                id: get_string(&row, 0, "id")?,
                key: get_string(&row, 1, "key")?,
                name: get_string(&row, 2, "name")?,
                color: get_optional(&row, 3, "color")?,
                sort_order: get_i64(&row, 4, "sort_order")?,
                is_active: get_i64(&row, 5, "is_active")? != 0,
            });
        }
        Ok(tags)
    }

    /// Look up a tag by key
    pub async fn find_tag_by_key(&self, key: &str) -> Result<Option<TagRef>, CatalogError> {
        let mut rows = self
            .conn
            .query("SELECT id, key FROM tool_tags WHERE key = ?", params![key])
            .await
            .map_err(|e| CatalogError::Query(format!("Failed to get tag: {}", e)))?;

        match rows.next().await? {
            Some(row) => Ok(Some(row_to_tag_ref(&row)?)),
            None => Ok(None),
        }
    }

    /// Insert a tag with a fresh id
    pub async fn create_tag(&self, tag: &NewTag) -> Result<TagRef, CatalogError> {
        let id = uuid::Uuid::new_v4().to_string();
        self.conn
            .execute(
                "INSERT INTO tool_tags (id, key, name, color, sort_order, is_active)
                 VALUES (?, ?, ?, ?, ?, 1)",
                params![
                    id.clone(),
                    tag.key.clone(),
                    tag.name.clone(),
                    tag.color.clone(),
                    tag.sort_order,
                ],
            )
            .await
            .map_err(|e| CatalogError::Query(format!("Failed to add tag {}: {}", tag.key, e)))?;

        Ok(TagRef {
            id,
            key: tag.key.clone(),
        })
    }

    fn entry_params(entry: &CatalogEntry) -> Result<Vec<libsql::Value>, CatalogError> {
        Ok(vec![
            entry.name.clone().into(),
            entry.description.clone().into(),
            entry.url.clone().into(),
            optional(&entry.logo),
            optional(&entry.title),
            optional(&entry.keywords),
            optional(&entry.og_image),
            entry.level.as_str().to_string().into(),
            optional(&entry.level_reason),
            i64::from(entry.learn_cost).into(),
            i64::from(entry.fail_rate).into(),
            i64::from(entry.time_cost).into(),
            serde_json::to_string(&entry.tag_ids)?.into(),
        ])
    }
}

impl CatalogStore for Database {
    #[instrument(skip(self))]
    async fn find_tags_all(&self) -> Result<Vec<TagRef>, CatalogError> {
        let mut rows = self
            .conn
            .query("SELECT id, key FROM tool_tags", params![])
            .await
            .map_err(|e| CatalogError::Query(format!("Failed to get tags: {}", e)))?;

        let mut tags = Vec::new();
        while let Some(row) = rows.next().await? {
            tags.push(row_to_tag_ref(&row)?);
        }
        debug!("Loaded {} tags", tags.len());
        Ok(tags)
    }

    async fn find_entry_by_key(&self, slug: &str) -> Result<Option<CatalogEntry>, CatalogError> {
        let sql = format!("SELECT {} FROM tools WHERE slug = ?", ENTRY_COLUMNS);
        let mut rows = self
            .conn
            .query(&sql, params![slug])
            .await
            .map_err(|e| CatalogError::Query(format!("Failed to get tool {}: {}", slug, e)))?;

        match rows.next().await? {
            Some(row) => Ok(Some(row_to_entry(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, entry), fields(slug = %entry.slug))]
    async fn create_entry(&self, entry: &CatalogEntry) -> Result<CatalogEntry, CatalogError> {
        let mut values: Vec<libsql::Value> = vec![entry.slug.clone().into()];
        values.extend(Self::entry_params(entry)?);

        self.conn
            .execute(
                "INSERT INTO tools (slug, name, description, url, logo, title, keywords, og_image,
                     level, level_reason, learn_cost, fail_rate, time_cost, tag_ids)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                values,
            )
            .await
            .map_err(|e| CatalogError::Query(format!("Failed to add tool {}: {}", entry.slug, e)))?;

        self.find_entry_by_key(&entry.slug)
            .await?
            .ok_or_else(|| CatalogError::NotFound(entry.slug.clone()))
    }

    #[instrument(skip(self, entry))]
    async fn update_entry(
        &self,
        slug: &str,
        entry: &CatalogEntry,
    ) -> Result<CatalogEntry, CatalogError> {
        let mut values = Self::entry_params(entry)?;
        values.push(slug.to_string().into());

        let changed = self
            .conn
            .execute(
                "UPDATE tools SET name = ?, description = ?, url = ?, logo = ?, title = ?,
                     keywords = ?, og_image = ?, level = ?, level_reason = ?, learn_cost = ?,
                     fail_rate = ?, time_cost = ?, tag_ids = ?
                 WHERE slug = ?",
                values,
            )
            .await
            .map_err(|e| CatalogError::Query(format!("Failed to update tool {}: {}", slug, e)))?;

        if changed == 0 {
            return Err(CatalogError::NotFound(slug.to_string()));
        }

        self.find_entry_by_key(slug)
            .await?
            .ok_or_else(|| CatalogError::NotFound(slug.to_string()))
    }
}

fn optional(value: &Option<String>) -> libsql::Value {
    match value {
        Some(value) => value.clone().into(),
        None => libsql::Value::Null,
    }
}

fn get_string(row: &Row, idx: i32, name: &str) -> Result<String, CatalogError> {
    row.get::<String>(idx)
        .map_err(|e| CatalogError::Data(format!("Failed to get {}: {}", name, e)))
}

fn get_optional(row: &Row, idx: i32, name: &str) -> Result<Option<String>, CatalogError> {
    row.get::<Option<String>>(idx)
        .map_err(|e| CatalogError::Data(format!("Failed to get {}: {}", name, e)))
}

fn get_i64(row: &Row, idx: i32, name: &str) -> Result<i64, CatalogError> {
    row.get::<i64>(idx)
        .map_err(|e| CatalogError::Data(format!("Failed to get {}: {}", name, e)))
}

fn get_score(row: &Row, idx: i32, name: &str) -> Result<u8, CatalogError> {
    let value = get_i64(row, idx, name)?;
    u8::try_from(value).map_err(|_| CatalogError::Data(format!("{} out of range: {}", name, value)))
}

fn row_to_tag_ref(row: &Row) -> Result<TagRef, CatalogError> {
    Ok(TagRef {
        id: get_string(row, 0, "id")?,
        key: get_string(row, 1, "key")?,
    })
}

fn row_to_entry(row: &Row) -> Result<CatalogEntry, CatalogError> {
    let level = get_string(row, 8, "level")?;
    let tag_ids = get_string(row, 13, "tag_ids")?;

    Ok(CatalogEntry {
        slug: get_string(row, 0, "slug")?,
        name: get_string(row, 1, "name")?,
        description: get_string(row, 2, "description")?,
        url: get_string(row, 3, "url")?,
        logo: get_optional(row, 4, "logo")?,
        title: get_optional(row, 5, "title")?,
        keywords: get_optional(row, 6, "keywords")?,
        og_image: get_optional(row, 7, "og_image")?,
        level: level.parse::<Level>().map_err(CatalogError::Data)?,
        level_reason: get_optional(row, 9, "level_reason")?,
        learn_cost: get_score(row, 10, "learn_cost")?,
        fail_rate: get_score(row, 11, "fail_rate")?,
        time_cost: get_score(row, 12, "time_cost")?,
        tag_ids: serde_json::from_str(&tag_ids)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_test_db() -> Result<(Database, tempfile::TempDir), CatalogError> {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir
            .path()
            .join("catalog.db")
            .to_string_lossy()
            .to_string();

        let db = Database::new_from_path(&db_path).await?;

        Ok((db, temp_dir))
    }

    fn sample_entry(slug: &str) -> CatalogEntry {
        CatalogEntry {
            slug: slug.to_string(),
            name: "Logo Cook".to_string(),
            description: "Generate logos".to_string(),
            url: "https://www.logocook.shop/".to_string(),
            logo: Some("https://www.logocook.shop/favicon.ico".to_string()),
            title: Some("Logo Cook - AI logos".to_string()),
            keywords: None,
            og_image: None,
            level: Level::Alternative,
            level_reason: Some("Quick custom logos".to_string()),
            learn_cost: 1,
            fail_rate: 1,
            time_cost: 2,
            tag_ids: vec!["t1".to_string(), "t2".to_string()],
        }
    }

    #[tokio::test]
    async fn test_database_initialization() {
        let (db, _temp_dir) = setup_test_db().await.unwrap();

        let mut result = db
            .conn
            .query(
                "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('tool_tags', 'tools')",
                params![],
            )
            .await
            .unwrap();

        let mut tables = Vec::new();
        while let Ok(Some(row)) = result.next().await {
            let table_name: String = row.get(0).unwrap();
            tables.push(table_name);
        }

        assert_eq!(tables.len(), 2);
        assert!(tables.contains(&"tool_tags".to_string()));
        assert!(tables.contains(&"tools".to_string()));
    }

    #[tokio::test]
    async fn test_create_and_find_entry() {
        let (db, _temp_dir) = setup_test_db().await.unwrap();
        let entry = sample_entry("logocook");

        assert!(db.find_entry_by_key("logocook").await.unwrap().is_none());

        let created = db.create_entry(&entry).await.unwrap();
        assert_eq!(created, entry);

        let found = db.find_entry_by_key("logocook").await.unwrap().unwrap();
        assert_eq!(found, entry);
    }

    #[tokio::test]
    async fn test_create_duplicate_slug_fails() {
        let (db, _temp_dir) = setup_test_db().await.unwrap();
        let entry = sample_entry("logocook");

        db.create_entry(&entry).await.unwrap();
        let result = db.create_entry(&entry).await;

        assert!(matches!(result, Err(CatalogError::Query(_))));
    }

    #[tokio::test]
    async fn test_update_entry_in_place() {
        let (db, _temp_dir) = setup_test_db().await.unwrap();
        db.create_entry(&sample_entry("logocook")).await.unwrap();

        let mut changed = sample_entry("logocook");
        changed.description = "Updated".to_string();
        changed.logo = None;
        changed.tag_ids = vec![];

        let updated = db.update_entry("logocook", &changed).await.unwrap();
        assert_eq!(updated, changed);

        let found = db.find_entry_by_key("logocook").await.unwrap().unwrap();
        assert_eq!(found.description, "Updated");
        assert!(found.logo.is_none());
        assert!(found.tag_ids.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_entry() {
        let (db, _temp_dir) = setup_test_db().await.unwrap();
        let result = db.update_entry("nope", &sample_entry("nope")).await;

        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_score_check_constraint() {
        let (db, _temp_dir) = setup_test_db().await.unwrap();
        let mut entry = sample_entry("bad");
        entry.learn_cost = 9;

        assert!(db.create_entry(&entry).await.is_err());
        assert!(db.find_entry_by_key("bad").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_tags() {
        let (db, _temp_dir) = setup_test_db().await.unwrap();

        let tag = NewTag {
            key: "ai-coding".to_string(),
            name: "AI Coding".to_string(),
            color: Some("#8B5CF6".to_string()),
            sort_order: 0,
        };
        let created = db.create_tag(&tag).await.unwrap();
        assert_eq!(created.key, "ai-coding");
        assert!(!created.id.is_empty());

        assert_eq!(db.find_tag_by_key("ai-coding").await.unwrap(), Some(created.clone()));
        assert!(db.find_tag_by_key("missing").await.unwrap().is_none());
        assert_eq!(db.find_tags_all().await.unwrap(), vec![created]);

        let listed = db.list_tags().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "AI Coding");
        assert!(listed[0].is_active);

        assert!(db.create_tag(&tag).await.is_err());
    }
}
