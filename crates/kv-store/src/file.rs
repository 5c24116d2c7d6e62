//! Directory-backed key-value store
//!
//! Each key is stored in `<dir>/<key>.json`. Writes go through a temp file
//! that is fsynced and then renamed over the target, so a reader never sees
//! a half-written value. When the rename fails the temp file is left in place
//! as a safety copy.

use crate::error::{Result, StoreError};
use crate::{check_capacity, validate_key, ChangeFeed, KeyValueStore};
use chrono::Local;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

const VALUE_EXTENSION: &str = "json";

/// What we last knew about a value file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

impl Fingerprint {
    fn of(path: &Path) -> Option<Self> {
        let meta = fs::metadata(path).ok()?;
        Some(Self {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

/// Store keeping one file per key under a directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    capacity: Option<usize>,
    ttl: Option<Duration>,
    known: Mutex<HashMap<String, Fingerprint>>,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    ///
    /// Files already present are treated as known, so they are not reported
    /// by the first [`ChangeFeed::poll_changes`] call.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Write {
            path: dir.clone(),
            source,
        })?;
        let store = Self {
            dir,
            capacity: None,
            ttl: None,
            known: Mutex::new(HashMap::new()),
        };
        let initial = store.scan()?;
        *store.known() = initial;
        Ok(store)
    }

    /// Default data directory for `app`
    ///
    /// - macOS: `~/Library/Application Support/<app>`
    /// - Linux: `$XDG_DATA_HOME/<app>` or `~/.local/share/<app>`
    pub fn default_dir(app: &str) -> Option<PathBuf> {
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            if !xdg.is_empty() {
                return Some(PathBuf::from(xdg).join(app));
            }
        }
        dirs::data_dir().map(|d| d.join(app))
    }

    /// Reject values larger than `capacity` bytes
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Treat values older than `ttl` as absent
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Root directory of the store
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the value for `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{VALUE_EXTENSION}"))
    }

    fn known(&self) -> MutexGuard<'_, HashMap<String, Fingerprint>> {
        self.known.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_expired(&self, path: &Path) -> bool {
        let Some(ttl) = self.ttl else {
            return false;
        };
        let age = fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| SystemTime::now().duration_since(modified).ok());
        matches!(age, Some(age) if age > ttl)
    }

    /// Current fingerprints of every value file in the directory.
    fn scan(&self) -> Result<HashMap<String, Fingerprint>> {
        let entries = fs::read_dir(&self.dir).map_err(|source| StoreError::Read {
            path: self.dir.clone(),
            source,
        })?;
        let mut found = HashMap::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(VALUE_EXTENSION) {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if validate_key(key).is_err() {
                continue;
            }
            if let Some(fp) = Fingerprint::of(&path) {
                found.insert(key.to_string(), fp);
            }
        }
        Ok(found)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        if self.is_expired(&path) {
            log::debug!("Value for {} at {} has expired", key, path.display());
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|source| StoreError::Read {
            path: path.clone(),
            source,
        })?;
        Ok(Some(content))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        check_capacity(key, value, self.capacity)?;

        let path = self.path_for(key);
        let timestamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
        let temp_path = path.with_file_name(format!(
            "{key}.{VALUE_EXTENSION}.tmp.{timestamp}.{}",
            std::process::id()
        ));

        fs::write(&temp_path, value).map_err(|source| StoreError::Write {
            path: temp_path.clone(),
            source,
        })?;

        // Fsync (ensure data is on disk)
        let file = fs::File::open(&temp_path).map_err(|source| StoreError::Write {
            path: temp_path.clone(),
            source,
        })?;
        file.sync_all().map_err(|source| StoreError::Write {
            path: temp_path.clone(),
            source,
        })?;

        fs::rename(&temp_path, &path).map_err(|e| {
            log::warn!(
                "Rename {} -> {} failed: {}",
                temp_path.display(),
                path.display(),
                e
            );
            StoreError::WriteAtomic {
                path: path.clone(),
                temp_path: temp_path.clone(),
            }
        })?;

        if let Some(fp) = Fingerprint::of(&path) {
            self.known().insert(key.to_string(), fp);
        }
        log::trace!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => return Err(StoreError::Write { path, source }),
        }
        self.known().remove(key);
        Ok(())
    }
}

impl ChangeFeed for FileStore {
    fn poll_changes(&self) -> Result<Vec<String>> {
        let current = self.scan()?;
        let mut known = self.known();
        let mut changed = BTreeSet::new();

        for (key, fp) in &current {
            if known.get(key) != Some(fp) {
                changed.insert(key.clone());
            }
        }
        for key in known.keys() {
            if !current.contains_key(key) {
                changed.insert(key.clone());
            }
        }

        if !changed.is_empty() {
            log::debug!("External changes detected: {:?}", changed);
        }
        *known = current;
        Ok(changed.into_iter().collect())
    }
}
