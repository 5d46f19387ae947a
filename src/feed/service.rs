//! Feed service
//!
//! The request path the dashboard drives: resolve the window, consult the
//! cache tiers, fall back to a full aggregation pass, and admit the result.
//! One instance per user session; the cache is its only mutable state.

use std::sync::Arc;

use crate::aggregate::{Aggregator, ConversationView};
use crate::cache::{Admission, CacheManager, CacheStatus, CacheStore, DiskCacheStore, MemoryCacheStore};
use crate::core::{FeedResult, TimeWindow};
use crate::directory::{AgentDirectory, HttpAgentDirectory};
use crate::source::{HttpMessageSource, MessageSource};

use super::config::FeedConfig;

/// Session-scoped feed facade
pub struct FeedService {
    aggregator: Aggregator,
    cache: CacheManager,
    default_window: TimeWindow,
}

impl FeedService {
    /// Create a service from configuration, wiring the HTTP collaborators
    /// and the configured cache store
    pub fn new(config: FeedConfig) -> Self {
        let directory: Arc<dyn AgentDirectory> =
            Arc::new(HttpAgentDirectory::new(&config.base_url, &config.api_key));
        let source: Arc<dyn MessageSource> =
            Arc::new(HttpMessageSource::new(&config.base_url, &config.api_key));
        let store: Arc<dyn CacheStore> = match &config.cache_dir {
            Some(dir) => Arc::new(DiskCacheStore::new(dir)),
            None => Arc::new(MemoryCacheStore::new()),
        };
        Self::with_components(directory, source, store, config)
    }

    /// Create a service over explicit collaborators; used by tests and by
    /// callers with their own transports or stores
    pub fn with_components(
        directory: Arc<dyn AgentDirectory>,
        source: Arc<dyn MessageSource>,
        store: Arc<dyn CacheStore>,
        config: FeedConfig,
    ) -> Self {
        let cache = CacheManager::new(store)
            .with_ttl(config.freshness_ttl)
            .with_max_entry_bytes(config.max_entry_bytes)
            .with_thresholds(config.moderate_bytes, config.near_limit_bytes);

        Self {
            aggregator: Aggregator::new(directory, source),
            cache,
            default_window: config.default_window,
        }
    }

    /// Resolve a window label, falling back to the configured default
    fn resolve_window(&self, label: &str) -> TimeWindow {
        match TimeWindow::parse(label) {
            Some(window) => window,
            None => {
                tracing::debug!(
                    "Unrecognized window label {:?}, using {}",
                    label,
                    self.default_window
                );
                self.default_window
            }
        }
    }

    /// Serve the feed for the given window label.
    ///
    /// Tiers, in order: one-time schema check, exact fresh cache match,
    /// hierarchical reuse from a broader fresh entry, then a full
    /// aggregation pass with cache admission. Only agent-directory failure
    /// surfaces as an error; every cache problem degrades to the next tier.
    pub async fn conversations(&self, window_label: &str) -> FeedResult<ConversationView> {
        let window = self.resolve_window(window_label);

        self.cache.ensure_schema();

        if let Some(view) = self.cache.lookup_fresh(window) {
            return Ok(view);
        }

        if let Some(view) = self.cache.lookup_covering(window) {
            return Ok(view);
        }

        tracing::info!("Cache miss for {}, fetching fresh data", window);
        let view = self.aggregator.collect(window).await?;

        match self.cache.admit(window, &view) {
            Admission::Stored => {}
            Admission::SkippedTooLarge => {
                tracing::info!("Serving {} uncached; view exceeded the size ceiling", window)
            }
            Admission::QuotaEvicted => {
                tracing::info!("Serving {} uncached; cache wiped under quota pressure", window)
            }
            Admission::Failed => tracing::info!("Serving {} uncached; cache write failed", window),
        }

        Ok(view)
    }

    /// Manual invalidation: clear every cached entry and immediately
    /// re-run the fetch path
    pub async fn refresh(&self, window_label: &str) -> FeedResult<ConversationView> {
        tracing::info!("Manual cache invalidation requested");
        self.cache.evict_namespace();
        self.conversations(window_label).await
    }

    /// Current cache footprint status; informational only
    pub fn cache_status(&self) -> CacheStatus {
        self.cache.status()
    }
}
