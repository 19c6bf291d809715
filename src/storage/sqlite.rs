//! SQLite search index implementation
//!
//! The whole crawl runs inside a single transaction opened by
//! [`SearchIndex::create`]; nothing is durable until [`SearchIndex::commit`].

use crate::state::{SymbolEntry, SymbolKind};
use crate::storage::schema::{initialize_schema, INSERT_SQL};
use crate::storage::traits::{IndexWriter, StorageError, StorageResult};
use rusqlite::{params, Connection};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite-backed search index shared by all crawl tasks
pub struct SearchIndex {
    conn: Mutex<Connection>,
}

impl SearchIndex {
    /// Creates a fresh index at `path` and opens the run's transaction
    ///
    /// Any existing file at `path` is discarded first. Failing to prepare the
    /// insert statement is reported here rather than on the first insert.
    pub fn create(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        match std::fs::remove_file(path) {
            Ok(()) => tracing::debug!("Removed previous index at {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;
        Self::begin(conn)
    }

    /// Creates an in-memory index with an open transaction (for testing)
    pub fn create_in_memory() -> StorageResult<Self> {
        Self::begin(Connection::open_in_memory()?)
    }

    /// Opens an existing index for reading, without a transaction
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn begin(conn: Connection) -> StorageResult<Self> {
        initialize_schema(&conn)?;
        conn.execute_batch("BEGIN")?;
        conn.prepare_cached(INSERT_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Commits the run's transaction
    ///
    /// Committing a second time is an error.
    pub fn commit(&self) -> StorageResult<()> {
        let conn = self.lock()?;
        if conn.is_autocommit() {
            return Err(StorageError::NotInTransaction);
        }
        conn.execute_batch("COMMIT")?;
        Ok(())
    }

    /// Counts all entries
    pub fn count_entries(&self) -> StorageResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM searchIndex", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Counts entries grouped by kind
    pub fn count_by_kind(&self) -> StorageResult<HashMap<SymbolKind, u64>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT type, COUNT(*) FROM searchIndex GROUP BY type")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = HashMap::new();
        for row in rows {
            let (kind, count) = row?;
            match SymbolKind::from_db_string(&kind) {
                Some(kind) => {
                    counts.insert(kind, count as u64);
                }
                None => tracing::warn!("Unknown symbol kind in index: {}", kind),
            }
        }
        Ok(counts)
    }

    /// All entries, ordered by (name, type, path)
    pub fn entries(&self) -> StorageResult<Vec<SymbolEntry>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT name, type, path FROM searchIndex ORDER BY name, type, path")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (name, kind, path) = row?;
            if let Some(kind) = SymbolKind::from_db_string(&kind) {
                entries.push(SymbolEntry { name, kind, path });
            }
        }
        Ok(entries)
    }

    /// SHA-256 over the index content, independent of row order
    pub fn content_digest(&self) -> StorageResult<String> {
        let mut hasher = Sha256::new();
        for entry in self.entries()? {
            hasher.update(entry.name.as_bytes());
            hasher.update([0]);
            hasher.update(entry.kind.to_db_string().as_bytes());
            hasher.update([0]);
            hasher.update(entry.path.as_bytes());
            hasher.update([b'\n']);
        }
        Ok(hex::encode(hasher.finalize()))
    }
}

impl IndexWriter for SearchIndex {
    fn insert(&self, entry: &SymbolEntry) -> StorageResult<bool> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(INSERT_SQL)?;
        let changed = stmt.execute(params![entry.name, entry.kind.to_db_string(), entry.path])?;
        Ok(changed > 0)
    }
}
