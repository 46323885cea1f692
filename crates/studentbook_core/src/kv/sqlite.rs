//! SQLite-backed durable key-value store.
//!
//! # Responsibility
//! - Persist whole string values in the `kv_entries` table.
//! - Create that table on first open and refuse files from newer builds.
//!
//! # Invariants
//! - Each `set` is one upsert statement, so SQLite's statement atomicity
//!   guarantees readers see either the previous value or the new one.
//! - `PRAGMA user_version` records the `kv_entries` layout; stored values
//!   are opaque and never migrated.
//! - No key is read or written before the schema check succeeds.

use super::{KvError, KvResult, KvStore};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::cmp::Ordering;
use std::path::Path;
use std::time::{Duration, Instant};

/// `kv_entries` layout version written to `PRAGMA user_version`.
pub const KV_SCHEMA_VERSION: u32 = 1;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_KV_ENTRIES: &str = "
CREATE TABLE IF NOT EXISTS kv_entries (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
);";

/// Durable `KvStore` owning one SQLite connection.
pub struct SqliteKvStore {
    conn: Connection,
}

impl SqliteKvStore {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> KvResult<Self> {
        Self::bootstrap("file", Connection::open(path.as_ref()))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> KvResult<Self> {
        Self::bootstrap("memory", Connection::open_in_memory())
    }

    /// Borrows the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn bootstrap(mode: &str, connected: rusqlite::Result<Connection>) -> KvResult<Self> {
        let started_at = Instant::now();
        let opened = connected.map_err(KvError::from).and_then(|mut conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            ensure_schema(&mut conn)?;
            Ok(Self { conn })
        });

        match &opened {
            Ok(_) => info!(
                "event=kv_open module=kv status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=kv_open module=kv status=error mode={mode} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
        opened
    }
}

fn ensure_schema(conn: &mut Connection) -> KvResult<()> {
    let found: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    match found.cmp(&KV_SCHEMA_VERSION) {
        Ordering::Equal => Ok(()),
        Ordering::Greater => Err(KvError::UnsupportedSchemaVersion {
            found,
            supported: KV_SCHEMA_VERSION,
        }),
        Ordering::Less => {
            let tx = conn.transaction()?;
            tx.execute_batch(CREATE_KV_ENTRIES)?;
            tx.pragma_update(None, "user_version", KV_SCHEMA_VERSION)?;
            tx.commit()?;
            info!(
                "event=kv_schema module=kv status=ok from_version={found} to_version={KV_SCHEMA_VERSION}"
            );
            Ok(())
        }
    }
}

impl KvStore for SqliteKvStore {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> KvResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{SqliteKvStore, KV_SCHEMA_VERSION};
    use crate::kv::KvStore;

    #[test]
    fn in_memory_store_is_stamped_with_schema_version() {
        let store = SqliteKvStore::open_in_memory().unwrap();

        let version: u32 = store
            .connection()
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, KV_SCHEMA_VERSION);
    }

    #[test]
    fn set_overwrites_previous_value() {
        let store = SqliteKvStore::open_in_memory().unwrap();

        store.set("@students_data", "[]").unwrap();
        store.set("@students_data", "[{}]").unwrap();

        assert_eq!(
            store.get("@students_data").unwrap().as_deref(),
            Some("[{}]")
        );
        let rows: i64 = store
            .connection()
            .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let store = SqliteKvStore::open_in_memory().unwrap();
        store.set("k", "v").unwrap();

        store.remove("k").unwrap();
        store.remove("k").unwrap();

        assert_eq!(store.get("k").unwrap(), None);
    }
}
