//! Key-value substrate contract and implementations.
//!
//! # Responsibility
//! - Define the whole-value get/set/remove contract the record store needs.
//! - Provide a durable SQLite-backed store and an in-process store.
//!
//! # Invariants
//! - `set` either persists the full value or fails; readers never observe a
//!   partially written value.
//! - After `set` returns `Ok`, a `get` on the same store observes the value.
//! - No transactions, compare-and-swap or key enumeration are offered.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryKvStore;
pub use sqlite::{SqliteKvStore, KV_SCHEMA_VERSION};

pub type KvResult<T> = Result<T, KvError>;

/// Substrate failure.
#[derive(Debug)]
pub enum KvError {
    /// SQLite-level failure (disk full, locked, permission).
    Sqlite(rusqlite::Error),
    /// The `kv_entries` file was written by a newer build.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
    /// Backend cannot serve the request at all.
    Unavailable(String),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "key-value schema version {found} is newer than supported {supported}"
            ),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::Unavailable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Whole-value string store addressed by key.
///
/// `Send` so a store can be moved onto the single-writer thread.
pub trait KvStore: Send {
    /// Returns the last value written for `key`, or `None`.
    fn get(&self, key: &str) -> KvResult<Option<String>>;
    /// Durably replaces the value under `key`.
    fn set(&self, key: &str, value: &str) -> KvResult<()>;
    /// Removes `key`; removing a missing key is not an error.
    fn remove(&self, key: &str) -> KvResult<()>;
}

impl<S: KvStore + ?Sized> KvStore for Box<S> {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> KvResult<()> {
        (**self).remove(key)
    }
}
