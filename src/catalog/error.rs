//! # Catalog Error Types Module
//!
//! Error types for the catalog store. Every store operation maps its failure
//! into one of these so the upserter can record a per-entry reason.

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    /// LibSQL error
    #[error("LibSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// SQL query error, including constraint violations
    #[error("SQL query error: {0}")]
    Query(String),

    /// Schema error
    #[error("Schema error: {0}")]
    Schema(String),

    /// A stored value could not be decoded
    #[error("Data error: {0}")]
    Data(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// No entry or tag with the given key
    #[error("Not found: {0}")]
    NotFound(String),

    /// Tag id column encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<CatalogError> for CrateError {
    fn from(err: CatalogError) -> Self {
        CrateError::Catalog(err.to_string())
    }
}
