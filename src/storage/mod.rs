//! Storage module for the docset search index
//!
//! This module handles all database operations, including:
//! - SQLite schema creation in the layout Dash expects
//! - Deduplicated inserts shared by concurrent crawl tasks
//! - The single run-wide transaction and its commit

mod schema;
mod sqlite;
mod traits;

pub use schema::{initialize_schema, INSERT_SQL, SCHEMA_SQL};
pub use sqlite::SearchIndex;
pub use traits::{IndexWriter, StorageError, StorageResult};
