//! Search index schema
//!
//! Dash reads `searchIndex` directly, so table and column names are fixed.

/// SQL schema for the index database
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS searchIndex (
    id INTEGER PRIMARY KEY,
    name TEXT,
    type TEXT,
    path TEXT
);

CREATE UNIQUE INDEX IF NOT EXISTS anchor ON searchIndex (name, type, path);
"#;

/// Insert statement shared by every writer; duplicates are ignored
pub const INSERT_SQL: &str = "INSERT OR IGNORE INTO searchIndex (name, type, path) VALUES (?1, ?2, ?3)";

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_initializes() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_table_and_unique_index_exist() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for (kind, name) in [("table", "searchIndex"), ("index", "anchor")] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = ?1 AND name = ?2",
                    [kind, name],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "{} {} should exist", kind, name);
        }
    }

    #[test]
    fn test_insert_statement_ignores_duplicates() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let first = conn.execute(INSERT_SQL, ["Foo", "Function", "pkg/a/index.html#Foo"]).unwrap();
        let second = conn.execute(INSERT_SQL, ["Foo", "Function", "pkg/a/index.html#Foo"]).unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 0);
    }
}
