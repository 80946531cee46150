//! SQLite implementation of the store traits.
//!
//! A single `entries` table maps text keys to blob values, with a
//! `modified_at` column (Unix ms) refreshed on every write. The connection is
//! kept behind a mutex so the store can be shared across threads.

use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StoreError};
use crate::migration::{self, now_millis};
use crate::traits::{ReadStore, Store, Timestamped};

/// SQLite-based key/value store.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute an operation on the connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("mutex poisoned: {}", e)))?;
        f(&conn)
    }

    /// Write an entry with an explicit modification time (Unix ms).
    pub fn write_at(&self, key: &str, value: &[u8], modified_at: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO entries (key, value, modified_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                                modified_at = excluded.modified_at",
                params![key, value, modified_at],
            )?;
            Ok(())
        })
    }

    /// Modification time of an entry in Unix ms.
    pub fn modified_at(&self, key: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT modified_at FROM entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| StoreError::not_found(key))
        })
    }
}

impl ReadStore for SqliteStore {
    type Key = String;
    type Value = Bytes;

    fn keys(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key FROM entries ORDER BY key")?;
            let keys = stmt
                .query_map([], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;
            Ok(keys)
        })
    }

    fn contains(&self, key: &String) -> Result<bool> {
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM entries WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    fn read(&self, key: &String) -> Result<Bytes> {
        self.with_conn(|conn| {
            let value: Option<Vec<u8>> = conn
                .query_row(
                    "SELECT value FROM entries WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            value
                .map(Bytes::from)
                .ok_or_else(|| StoreError::not_found(key))
        })
    }

    fn len(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
            Ok(count as usize)
        })
    }
}

impl Store for SqliteStore {
    fn write(&mut self, key: &String, value: Bytes) -> Result<()> {
        self.write_at(key, &value, now_millis())
    }

    fn delete(&mut self, key: &String) -> Result<()> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM entries WHERE key = ?1", params![key])?;
            if removed == 0 {
                return Err(StoreError::not_found(key));
            }
            Ok(())
        })
    }
}

impl Timestamped for SqliteStore {
    fn modified(&self, key: &String) -> Result<SystemTime> {
        let millis = self.modified_at(key)?;
        Ok(UNIX_EPOCH + Duration::from_millis(millis.max(0) as u64))
    }
}
