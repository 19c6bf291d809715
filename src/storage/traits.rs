//! Storage traits and error types
//!
//! This module defines the write interface the crawler uses for the search
//! index and the associated error types.

use crate::state::SymbolEntry;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Index lock poisoned by a panicking writer")]
    LockPoisoned,

    #[error("No open transaction to commit")]
    NotInTransaction,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Write side of the search index
///
/// Implementations must be safe to call from many tasks at once; callers do
/// not coordinate with each other.
pub trait IndexWriter: Send + Sync {
    /// Inserts an entry, returning `false` if an identical one already exists
    fn insert(&self, entry: &SymbolEntry) -> StorageResult<bool>;

    /// Inserts every entry, returning how many were new
    fn insert_all(&self, entries: &[SymbolEntry]) -> StorageResult<usize> {
        let mut inserted = 0;
        for entry in entries {
            if self.insert(entry)? {
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}
