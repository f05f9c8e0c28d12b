//! Sqlite-backed save store.
use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension};

use puzzlebox_core::{SaveStore, StoreError};

/// Key-value table shared by every game. Clones share the connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path`
    pub fn open(path: &Path) -> Result<Self, rusqlite::Error> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, rusqlite::Error> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )?;
        Ok(SqliteStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> Result<T, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        f(&conn).map_err(|e| StoreError::Backend(e.to_string()))
    }
}

impl SaveStore for SqliteStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
                .optional()
        })
    }

    fn save(&self, key: &str, json: &str) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                [key, json],
            )
            .map(|_| ())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.load("hanoi-storage").unwrap(), None);
    }

    #[test]
    fn test_save_overwrites() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.save("k", "1").unwrap();
        store.save("k", "2").unwrap();
        assert_eq!(store.load("k").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_clones_share_rows() {
        let store = SqliteStore::open_in_memory().unwrap();
        let other = store.clone();
        store.save("lights-storage", "{}").unwrap();
        assert_eq!(other.load("lights-storage").unwrap().as_deref(), Some("{}"));
    }
}
