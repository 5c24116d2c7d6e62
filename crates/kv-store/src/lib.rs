//! Small-capacity key-value stores
//!
//! This crate provides the storage seam used to persist workspace snapshots:
//! a [`KeyValueStore`] trait with string keys and string values, plus a
//! [`ChangeFeed`] for learning about writes made by someone else (another
//! process, another window) to the same keys.
//!
//! Two implementations ship with the crate:
//!
//! - [`FileStore`]: one file per key under a directory, written with the
//!   temp-file-then-rename pattern, with an optional capacity ceiling and
//!   time-to-live.
//! - [`MemoryStore`]: in-process map, used by tests and ephemeral sessions.
//!
//! # Examples
//!
//! ```
//! use kv_store::{KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.set("savedLayout", "{}")?;
//! assert_eq!(store.get("savedLayout")?.as_deref(), Some("{}"));
//! # Ok::<(), kv_store::StoreError>(())
//! ```

#![warn(missing_docs)]

mod error;
mod file;
mod memory;

pub use error::{Result, StoreError};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Practical ceiling for a single value, matching small browser-style stores.
pub const DEFAULT_CAPACITY_BYTES: usize = 4096;

/// String key-value storage.
///
/// Implementations use interior mutability so a store can be shared by
/// reference between the components that read and write it.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` when absent or expired.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the value under `key`. Deleting an absent key succeeds.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Notification source for writes made outside this store handle.
///
/// Polling based: each call returns the keys that changed externally since
/// the previous call. Writes made through the same handle are never reported.
pub trait ChangeFeed {
    /// Keys changed externally since the last poll, sorted and deduplicated.
    fn poll_changes(&self) -> Result<Vec<String>>;
}

/// Check that `key` is usable as a file stem.
///
/// Keys must be non-empty and contain only ASCII letters, digits, `-` and `_`.
pub fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// Reject values larger than `capacity` bytes.
pub(crate) fn check_capacity(key: &str, value: &str, capacity: Option<usize>) -> Result<()> {
    match capacity {
        Some(capacity) if value.len() > capacity => Err(StoreError::CapacityExceeded {
            key: key.to_string(),
            size: value.len(),
            capacity,
        }),
        _ => Ok(()),
    }
}
