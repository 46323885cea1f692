//! In-process key-value store.
//!
//! Clones share the same map, so a test can keep one handle for inspection
//! while another is owned by a repository.

use super::{KvError, KvResult, KvStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Non-durable `KvStore` backed by a shared hash map.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> KvResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> KvResult<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> KvResult<MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| KvError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> KvResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
