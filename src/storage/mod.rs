//! Storage Layer - SQLite-backed Paper tables
//!
//! Each dataset is a pair of identically shaped tables:
//! - `<table>(id, aulast, ..., doi, ..., citations)` holding Papers
//! - `<table>_citations` holding the Papers they cite
//!
//! `citations` columns hold JSON arrays of ids into `<table>_citations`.

pub mod catalog;
pub mod conflict;
pub mod cursor;
pub mod schema;
pub mod store;

pub use catalog::ColumnDescriptor;
pub use cursor::Papers;
pub use store::{Depth, OnDuplicate, PaperStore, RowId, DEFAULT_BATCH_SIZE};
