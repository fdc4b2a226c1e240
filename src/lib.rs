//! # Papertable - Papers in a table, not in memory
//!
//! A list-like collection of bibliographic records backed by SQLite.
//!
//! Papertable provides:
//! - A `Paper` record with author, venue and natural-key identifier fields
//! - `PaperStore`, a sequence over one table that caches only row ids
//! - A sibling `<table>_citations` table, itself a `PaperStore`, holding cited Papers
//! - Insert-or-reuse deduplication of citations by natural key
//! - Lazy, restartable iteration over the whole table

pub mod paper;
pub mod value;
pub mod storage;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use paper::{FieldKind, Paper};
pub use value::FieldValue;
pub use storage::{OnDuplicate, PaperStore, RowId};
pub use config::{ConnectionParams, PapertableConfig};

/// Result type alias for Papertable operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Papertable operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No Paper with id {0}")]
    NotFound(RowId),

    #[error("Index {index} out of range for store of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Paper already exists ({}): {detail}", .column.as_deref().unwrap_or("unknown key"))]
    DuplicateRecord {
        column: Option<String>,
        detail: String,
    },

    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field {field} expects a {expected} value")]
    FieldType { field: String, expected: FieldKind },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
