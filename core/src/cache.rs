//! In-process lookup cache guarded by a reader/writer lock.
//!
//! Entries never expire; the only invalidation is [`ResourceCache::clear`],
//! which drops every entry at once.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Separator between the two identifiers of a composite key.
pub const KEY_SEPARATOR: char = ':';

/// `first:second`, the key under which a lookup result is cached.
pub fn composite_key(first: &str, second: &str) -> String {
    format!("{first}{KEY_SEPARATOR}{second}")
}

/// Maps composite keys to previously fetched values.
///
/// Lookups share a read lock and run concurrently; `store` and `clear` take
/// the write lock. A poisoned lock is recovered rather than surfaced, since
/// every critical section leaves the map consistent.
#[derive(Debug)]
pub struct ResourceCache<V> {
    entries: RwLock<HashMap<String, V>>,
}

impl<V> Default for ResourceCache<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V: Clone> ResourceCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    /// Insert or overwrite the value for `key`.
    pub fn store(&self, key: String, value: V) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key, value);
    }

    /// Replace the whole mapping with an empty one.
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        *entries = HashMap::new();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
