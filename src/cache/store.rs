//! Cache persistence backends
//!
//! Handles reading and writing cache entries as opaque strings under string
//! keys. The disk store keeps one JSON file per key and can enforce a byte
//! capacity, surfacing quota errors the way a browser storage backend would.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::core::{FeedError, FeedResult};

/// Key/value persistence for cache entries.
///
/// Effectively single-writer per session; writes are always wholesale
/// replacements, so implementations need no finer-grained coordination than
/// atomic read-then-write per key.
pub trait CacheStore: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> FeedResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// Returns `FeedError::CacheQuota` when the backing capacity is
    /// exhausted.
    fn put(&self, key: &str, value: &str) -> FeedResult<()>;

    /// Delete the value under `key`, if present
    fn remove(&self, key: &str) -> FeedResult<()>;

    /// All stored keys
    fn keys(&self) -> FeedResult<Vec<String>>;

    /// Total stored footprint in bytes
    fn total_bytes(&self) -> FeedResult<u64>;
}

// ============================================================================
// Disk store
// ============================================================================

/// Disk-backed cache store: one JSON file per key under a base directory
#[derive(Debug, Clone)]
pub struct DiskCacheStore {
    base_dir: PathBuf,
    capacity: Option<u64>,
}

impl DiskCacheStore {
    /// Create a store rooted at `dir` with no capacity limit
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: dir.into(),
            capacity: None,
        }
    }

    /// Enforce a byte capacity; writes that would exceed it fail with a
    /// quota error
    pub fn with_capacity(mut self, capacity: u64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", key))
    }

    fn ensure_dir(&self) -> FeedResult<()> {
        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir)?;
        }
        Ok(())
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl CacheStore for DiskCacheStore {
    fn get(&self, key: &str) -> FeedResult<Option<String>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let mut contents = String::new();
        File::open(&path)?.read_to_string(&mut contents)?;
        Ok(Some(contents))
    }

    fn put(&self, key: &str, value: &str) -> FeedResult<()> {
        self.ensure_dir()?;

        if let Some(capacity) = self.capacity {
            let existing = self
                .get(key)?
                .map(|current| current.len() as u64)
                .unwrap_or(0);
            let occupied = self.total_bytes()? - existing;
            if occupied + value.len() as u64 > capacity {
                return Err(FeedError::CacheQuota(format!(
                    "{} bytes needed, {} available",
                    value.len(),
                    capacity.saturating_sub(occupied)
                )));
            }
        }

        let file = File::create(self.entry_path(key))?;
        let mut writer = BufWriter::new(file);
        writer.write_all(value.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> FeedResult<()> {
        let path = self.entry_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn keys(&self) -> FeedResult<Vec<String>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }
        Ok(keys)
    }

    fn total_bytes(&self) -> FeedResult<u64> {
        if !self.base_dir.exists() {
            return Ok(0);
        }

        let mut total = 0;
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            if entry.path().is_file() {
                total += entry.metadata()?.len();
            }
        }
        Ok(total)
    }
}

// ============================================================================
// Memory store
// ============================================================================

/// In-memory cache store for sessions that want the cache policy without
/// persistence
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, String>>,
    capacity: Option<u64>,
}

impl MemoryCacheStore {
    /// Create an empty store with no capacity limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Enforce a byte capacity; writes that would exceed it fail with a
    /// quota error
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity: Some(capacity),
        }
    }

    fn footprint(entries: &HashMap<String, String>) -> u64 {
        entries.values().map(|value| value.len() as u64).sum()
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> FeedResult<Option<String>> {
        let entries = self.entries.lock().expect("cache store lock poisoned");
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> FeedResult<()> {
        let mut entries = self.entries.lock().expect("cache store lock poisoned");

        if let Some(capacity) = self.capacity {
            let existing = entries.get(key).map(|v| v.len() as u64).unwrap_or(0);
            let projected = Self::footprint(&entries) - existing + value.len() as u64;
            if projected > capacity {
                return Err(FeedError::CacheQuota(format!(
                    "{} bytes needed, capacity {}",
                    value.len(),
                    capacity
                )));
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> FeedResult<()> {
        let mut entries = self.entries.lock().expect("cache store lock poisoned");
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> FeedResult<Vec<String>> {
        let entries = self.entries.lock().expect("cache store lock poisoned");
        Ok(entries.keys().cloned().collect())
    }

    fn total_bytes(&self) -> FeedResult<u64> {
        let entries = self.entries.lock().expect("cache store lock poisoned");
        Ok(Self::footprint(&entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn disk_store() -> (DiskCacheStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = DiskCacheStore::new(temp_dir.path());
        (store, temp_dir)
    }

    #[test]
    fn test_disk_put_get_remove() {
        let (store, _temp) = disk_store();

        assert!(store.get("conversations_24h").unwrap().is_none());

        store.put("conversations_24h", "{\"x\":1}").unwrap();
        assert_eq!(
            store.get("conversations_24h").unwrap().as_deref(),
            Some("{\"x\":1}")
        );

        store.remove("conversations_24h").unwrap();
        assert!(store.get("conversations_24h").unwrap().is_none());
    }

    #[test]
    fn test_disk_keys_and_total_bytes() {
        let (store, _temp) = disk_store();

        store.put("conversations_1h", "aaaa").unwrap();
        store.put("conversations_7d", "bbbbbbbb").unwrap();

        let mut keys = store.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["conversations_1h", "conversations_7d"]);
        assert_eq!(store.total_bytes().unwrap(), 12);
    }

    #[test]
    fn test_disk_overwrite_is_wholesale() {
        let (store, _temp) = disk_store();

        store.put("conversations_1h", "original-payload").unwrap();
        store.put("conversations_1h", "new").unwrap();
        assert_eq!(store.get("conversations_1h").unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn test_disk_capacity_quota() {
        let temp_dir = TempDir::new().unwrap();
        let store = DiskCacheStore::new(temp_dir.path()).with_capacity(10);

        store.put("a", "12345").unwrap();
        let err = store.put("b", "123456789").unwrap_err();
        assert!(err.is_quota());

        // Replacing an existing key only counts the delta
        store.put("a", "1234567890").unwrap();
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryCacheStore::new();

        store.put("k", "value").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("value"));
        assert_eq!(store.total_bytes().unwrap(), 5);

        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
        assert_eq!(store.total_bytes().unwrap(), 0);
    }

    #[test]
    fn test_memory_capacity_quota() {
        let store = MemoryCacheStore::with_capacity(8);

        store.put("a", "1234").unwrap();
        assert!(store.put("b", "123456").unwrap_err().is_quota());
        store.put("b", "1234").unwrap();
    }
}
