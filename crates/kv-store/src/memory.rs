//! In-process key-value store.

use crate::error::Result;
use crate::{check_capacity, validate_key, ChangeFeed, KeyValueStore};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

/// Map-backed store living in process memory.
///
/// [`MemoryStore::write_external`] simulates a write from another context so
/// the change feed can be exercised without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    pending: Mutex<BTreeSet<String>>,
    capacity: Option<usize>,
}

impl MemoryStore {
    /// Unbounded empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store rejecting values over `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Write as if another context changed the key, queueing a change notification.
    pub fn write_external(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        lock(&self.values).insert(key.to_string(), value.to_string());
        lock(&self.pending).insert(key.to_string());
        Ok(())
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        lock(&self.values).len()
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// A poisoned lock only means a panic elsewhere mid-insert; the map is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(lock(&self.values).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        check_capacity(key, value, self.capacity)?;
        lock(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        lock(&self.values).remove(key);
        Ok(())
    }
}

impl ChangeFeed for MemoryStore {
    fn poll_changes(&self) -> Result<Vec<String>> {
        let mut pending = lock(&self.pending);
        Ok(std::mem::take(&mut *pending).into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;

    #[test]
    fn test_set_then_get() {
        let store = MemoryStore::new();
        store.set("savedLayout", "{\"a\":1}").expect("set should succeed");
        assert_eq!(
            store.get("savedLayout").expect("get should succeed").as_deref(),
            Some("{\"a\":1}")
        );
    }

    #[test]
    fn test_get_missing_returns_none() {
        let store = MemoryStore::new();
        assert!(store.get("missing").expect("get should succeed").is_none());
    }

    #[test]
    fn test_remove_absent_key_is_ok() {
        let store = MemoryStore::new();
        store.remove("never-set").expect("remove should succeed");
        assert!(store.is_empty());
    }

    #[test]
    fn test_capacity_rejects_oversized_value() {
        let store = MemoryStore::with_capacity(8);
        let err = store
            .set("k", "0123456789")
            .expect_err("oversized value should be rejected");
        assert!(matches!(err, StoreError::CapacityExceeded { size: 10, .. }));
        assert!(store.get("k").expect("get should succeed").is_none());
    }

    #[test]
    fn test_own_writes_are_not_reported() {
        let store = MemoryStore::new();
        store.set("savedLayout", "{}").expect("set should succeed");
        assert!(store.poll_changes().expect("poll should succeed").is_empty());
    }

    #[test]
    fn test_external_writes_are_reported_once() {
        let store = MemoryStore::new();
        store.write_external("widgetColors", "{}").expect("write should succeed");
        store.write_external("savedLayout", "{}").expect("write should succeed");
        store.write_external("widgetColors", "{\"x\":\"1\"}").expect("write should succeed");

        let changes = store.poll_changes().expect("poll should succeed");
        assert_eq!(changes, vec!["savedLayout", "widgetColors"]);
        assert!(store.poll_changes().expect("poll should succeed").is_empty());
        assert_eq!(
            store.get("widgetColors").expect("get should succeed").as_deref(),
            Some("{\"x\":\"1\"}")
        );
    }
}
