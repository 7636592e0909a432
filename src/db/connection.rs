use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, params};

use crate::db::store::KeyValueStore;
use crate::error::{LedgerError, Result};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS entries (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL
)";

/// Key-value store kept in a single SQLite table.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            LedgerError::StoreUnavailable(format!(
                "Failed to open database '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::with_schema(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            LedgerError::StoreUnavailable(format!("Failed to open in-memory database: {}", e))
        })?;
        Self::with_schema(conn)
    }

    fn with_schema(conn: Connection) -> Result<Self> {
        conn.execute(SCHEMA, []).map_err(|e| {
            LedgerError::StoreUnavailable(format!("Failed to create schema: {}", e))
        })?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| LedgerError::StoreUnavailable("connection lock poisoned".to_string()))
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.lock()?
            .query_row("SELECT value FROM entries WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e| LedgerError::StoreUnavailable(format!("Failed to read '{}': {}", key, e)))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.lock()?
            .execute(
                "INSERT INTO entries (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(|e| LedgerError::StoreUnavailable(format!("Failed to write '{}': {}", key, e)))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.lock()?
            .execute("DELETE FROM entries WHERE key = ?1", [key])
            .map_err(|e| {
                LedgerError::StoreUnavailable(format!("Failed to delete '{}': {}", key, e))
            })?;
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT key FROM entries WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key",
            )
            .map_err(|e| LedgerError::StoreUnavailable(format!("Failed to prepare statement: {}", e)))?;

        let key_iter = stmt
            .query_map([prefix], |row| row.get::<_, String>(0))
            .map_err(|e| {
                LedgerError::StoreUnavailable(format!("Failed to list '{}': {}", prefix, e))
            })?;

        let mut keys = Vec::new();
        for key in key_iter {
            keys.push(key.map_err(|e| {
                LedgerError::StoreUnavailable(format!("Failed to read key: {}", e))
            })?);
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_get_missing_key() {
        let store = SqliteStore::open_in_memory().unwrap();

        assert_eq!(store.get("reg:nothing").unwrap(), None);
    }

    #[test]
    fn test_put_then_get() {
        let store = SqliteStore::open_in_memory().unwrap();

        store.put("reg:1", b"first").unwrap();
        assert_eq!(store.get("reg:1").unwrap(), Some(b"first".to_vec()));
    }

    #[test]
    fn test_put_overwrites() {
        let store = SqliteStore::open_in_memory().unwrap();

        store.put("reg:1", b"first").unwrap();
        store.put("reg:1", b"second").unwrap();

        assert_eq!(store.get("reg:1").unwrap(), Some(b"second".to_vec()));
        assert_eq!(store.list("").unwrap().len(), 1);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = SqliteStore::open_in_memory().unwrap();

        store.put("reg:1", b"value").unwrap();
        assert!(store.delete("reg:1").is_ok());
        assert!(store.delete("reg:1").is_ok());
        assert_eq!(store.get("reg:1").unwrap(), None);
    }

    #[test]
    fn test_list_by_prefix() {
        let store = SqliteStore::open_in_memory().unwrap();

        store.put("reg:b", b"1").unwrap();
        store.put("reg:a", b"2").unwrap();
        store.put("axb:a", b"3").unwrap();
        store.put("regular", b"4").unwrap();

        assert_eq!(store.list("reg:").unwrap(), vec!["reg:a", "reg:b"]);
        assert_eq!(store.list("axb:").unwrap(), vec!["axb:a"]);
        assert!(store.list("vpn:").unwrap().is_empty());
    }

    #[test]
    fn test_prefix_is_not_a_pattern() {
        let store = SqliteStore::open_in_memory().unwrap();

        store.put("reg:1", b"1").unwrap();
        store.put("rXg:1", b"2").unwrap();

        assert_eq!(store.list("r_g:").unwrap().len(), 0);
        assert_eq!(store.list("%").unwrap().len(), 0);
    }

    #[test]
    fn test_open_persists_to_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.put("opr:1", b"kept").unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.get("opr:1").unwrap(), Some(b"kept".to_vec()));
    }
}
