//! Cache policy manager
//!
//! Owns the window-keyed cache lifecycle: freshness, hierarchical reuse,
//! size-gated admission, quota-triggered eviction, and the one-time
//! versioned wipe after incompatible shape changes.

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::aggregate::aggregator::retain_message;
use crate::aggregate::merge::resequence;
use crate::aggregate::ConversationView;
use crate::core::TimeWindow;

use super::entry::CacheEntry;
use super::store::CacheStore;

/// Prefix shared by every window-keyed entry
const NAMESPACE: &str = "conversations_";

/// Marker key recording the cached-shape version; deliberately outside the
/// namespace so a namespace wipe cannot clear it
const SCHEMA_MARKER_KEY: &str = "feed_schema_version";

/// Current cached-shape version; bump when classification or view shape
/// changes incompatibly with previously cached entries
const SCHEMA_VERSION: &str = "v1";

/// Default freshness TTL: 5 minutes
const DEFAULT_TTL_SECS: i64 = 5 * 60;

/// Default per-entry admission ceiling: 3 MB
const DEFAULT_MAX_ENTRY_BYTES: usize = 3 * 1024 * 1024;

/// Default footprint thresholds: 4 MB "moderate", 8 MB "near limit"
const DEFAULT_MODERATE_BYTES: u64 = 4 * 1024 * 1024;
const DEFAULT_NEAR_LIMIT_BYTES: u64 = 8 * 1024 * 1024;

/// Observability signal for cache footprint; never an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Footprint well under the thresholds
    Enabled,
    /// Footprint past the moderate threshold
    Moderate,
    /// Footprint approaching the backing quota
    NearLimit,
    /// Store is unreadable; caching is effectively off
    Disabled,
}

/// Outcome of an admission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Entry written
    Stored,
    /// Serialized view exceeded the ceiling; skipped, not a failure
    SkippedTooLarge,
    /// Quota write failure; whole namespace evicted, cycle proceeds uncached
    QuotaEvicted,
    /// Store write failed for another reason; skipped
    Failed,
}

/// Window-keyed cache with freshness and reuse policy
pub struct CacheManager {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
    max_entry_bytes: usize,
    moderate_bytes: u64,
    near_limit_bytes: u64,
}

impl CacheManager {
    /// Create a manager over the given store with default policy
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            ttl: Duration::seconds(DEFAULT_TTL_SECS),
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
            moderate_bytes: DEFAULT_MODERATE_BYTES,
            near_limit_bytes: DEFAULT_NEAR_LIMIT_BYTES,
        }
    }

    /// Set the freshness TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the per-entry admission ceiling in bytes
    pub fn with_max_entry_bytes(mut self, max_entry_bytes: usize) -> Self {
        self.max_entry_bytes = max_entry_bytes;
        self
    }

    /// Set the footprint status thresholds in bytes
    pub fn with_thresholds(mut self, moderate_bytes: u64, near_limit_bytes: u64) -> Self {
        self.moderate_bytes = moderate_bytes;
        self.near_limit_bytes = near_limit_bytes;
        self
    }

    fn entry_key(window: TimeWindow) -> String {
        format!("{}{}", NAMESPACE, window.label())
    }

    fn read_entry(&self, window: TimeWindow) -> Option<CacheEntry> {
        let key = Self::entry_key(window);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!("Cache read failed for {}: {}", key, err);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("Discarding undecodable cache entry {}: {}", key, err);
                let _ = self.store.remove(&key);
                None
            }
        }
    }

    /// One-time versioned wipe: when the persisted schema marker is absent
    /// or does not match the current version, evict the namespace and set
    /// the marker. Store failures degrade to a no-op.
    pub fn ensure_schema(&self) {
        let marker = self.store.get(SCHEMA_MARKER_KEY).unwrap_or(None);
        if marker.as_deref() == Some(SCHEMA_VERSION) {
            return;
        }

        tracing::info!(
            "Cached shapes predate schema {}; wiping cache namespace once",
            SCHEMA_VERSION
        );
        self.evict_namespace();
        if let Err(err) = self.store.put(SCHEMA_MARKER_KEY, SCHEMA_VERSION) {
            tracing::warn!("Failed to persist schema marker: {}", err);
        }
    }

    /// Exact-match lookup: a fresh entry for `window`, or nothing
    pub fn lookup_fresh(&self, window: TimeWindow) -> Option<ConversationView> {
        let entry = self.read_entry(window)?;
        if !entry.is_fresh(Utc::now(), self.ttl) {
            tracing::debug!("Cache entry for {} is stale", window);
            return None;
        }
        tracing::debug!("Serving {} from exact cache match", window);
        Some(entry.view)
    }

    /// Hierarchical reuse: scan broader windows for a fresh entry and
    /// re-apply the cutoff predicate for `window` to its stored entries.
    ///
    /// Returns the re-filtered, densely resequenced subset; writes nothing.
    pub fn lookup_covering(&self, window: TimeWindow) -> Option<ConversationView> {
        let now = Utc::now();
        let cutoff = window.cutoff(now);

        for candidate in TimeWindow::ALL {
            if candidate == window || !candidate.covers(window) {
                continue;
            }
            let Some(entry) = self.read_entry(candidate) else {
                continue;
            };
            if !entry.is_fresh(now, self.ttl) {
                continue;
            }

            tracing::debug!("Serving {} by re-filtering cached {} data", window, candidate);
            let mut view = entry.view;
            view.entries
                .retain(|item| retain_message(&item.message, cutoff));
            view.entries = resequence(std::mem::take(&mut view.entries));
            view.window_label = window.label().to_string();
            return Some(view);
        }

        None
    }

    /// Size gate for admission: the ceiling is exclusive, so an entry of
    /// exactly `max_entry_bytes` is not cached
    fn over_ceiling(&self, size: usize) -> bool {
        size >= self.max_entry_bytes
    }

    /// Admit a freshly aggregated view: serialize, gate on the size
    /// ceiling, and write wholesale. A quota failure evicts the whole
    /// namespace; the caller proceeds without cache either way.
    pub fn admit(&self, window: TimeWindow, view: &ConversationView) -> Admission {
        let entry = CacheEntry::new(window.label(), view.clone());
        let serialized = match serde_json::to_string(&entry) {
            Ok(serialized) => serialized,
            Err(err) => {
                tracing::warn!("Failed to serialize view for caching: {}", err);
                return Admission::Failed;
            }
        };

        if self.over_ceiling(serialized.len()) {
            tracing::warn!(
                "View for {} is {} bytes, over the {} byte ceiling; not caching",
                window,
                serialized.len(),
                self.max_entry_bytes
            );
            return Admission::SkippedTooLarge;
        }

        match self.store.put(&Self::entry_key(window), &serialized) {
            Ok(()) => {
                tracing::debug!("Cached {} view ({} bytes)", window, serialized.len());
                Admission::Stored
            }
            Err(err) if err.is_quota() => {
                tracing::warn!("Cache quota exceeded ({}); evicting all entries", err);
                self.evict_namespace();
                Admission::QuotaEvicted
            }
            Err(err) => {
                tracing::warn!("Cache write failed for {}: {}", window, err);
                Admission::Failed
            }
        }
    }

    /// Evict every window-keyed entry; the schema marker survives
    pub fn evict_namespace(&self) {
        let keys = match self.store.keys() {
            Ok(keys) => keys,
            Err(err) => {
                tracing::warn!("Cache eviction could not list keys: {}", err);
                return;
            }
        };

        for key in keys {
            if key.starts_with(NAMESPACE) {
                if let Err(err) = self.store.remove(&key) {
                    tracing::warn!("Failed to evict cache entry {}: {}", key, err);
                }
            }
        }
    }

    /// Footprint status across the whole store; informational only.
    ///
    /// Thresholds are strict: a footprint of exactly the moderate or
    /// near-limit value reports the state below it.
    pub fn status(&self) -> CacheStatus {
        match self.store.total_bytes() {
            Ok(total) if total > self.near_limit_bytes => CacheStatus::NearLimit,
            Ok(total) if total > self.moderate_bytes => CacheStatus::Moderate,
            Ok(_) => CacheStatus::Enabled,
            Err(err) => {
                tracing::warn!("Cache status probe failed: {}", err);
                CacheStatus::Disabled
            }
        }
    }
}
