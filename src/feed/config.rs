//! Feed service configuration
//!
//! Configuration options for a `FeedService`.

use std::path::PathBuf;

use chrono::Duration;

use crate::core::{FeedError, FeedResult, TimeWindow};

/// Environment variable holding the platform base URL
pub const BASE_URL_ENV: &str = "AGENT_PLATFORM_BASE_URL";

/// Environment variable holding the platform API key
pub const API_KEY_ENV: &str = "AGENT_PLATFORM_API_KEY";

/// Configuration for a `FeedService`
///
/// Use the builder pattern to configure the service:
///
/// ```ignore
/// let config = FeedConfig::new("https://api.example.com", "sk-...")
///     .with_cache_dir("cache")
///     .with_freshness_ttl(Duration::minutes(5))
///     .with_max_entry_bytes(3 * 1024 * 1024)
///     .with_default_window(TimeWindow::OneDay);
/// ```
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Agent platform base URL
    pub base_url: String,

    /// Agent platform API key
    pub api_key: String,

    /// Directory for the disk cache store; `None` keeps the cache in memory
    pub cache_dir: Option<PathBuf>,

    /// Maximum cache entry age before re-fetching
    pub freshness_ttl: Duration,

    /// Per-entry admission ceiling in bytes
    pub max_entry_bytes: usize,

    /// Footprint threshold for the "moderate" status signal
    pub moderate_bytes: u64,

    /// Footprint threshold for the "near limit" status signal
    pub near_limit_bytes: u64,

    /// Window used when a request carries an unrecognized label
    pub default_window: TimeWindow,
}

impl FeedConfig {
    /// Create a configuration with the given platform endpoint and key
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            cache_dir: None,
            freshness_ttl: Duration::minutes(5),
            max_entry_bytes: 3 * 1024 * 1024,
            moderate_bytes: 4 * 1024 * 1024,
            near_limit_bytes: 8 * 1024 * 1024,
            default_window: TimeWindow::OneDay,
        }
    }

    /// Read the endpoint and key from the environment
    pub fn from_env() -> FeedResult<Self> {
        let base_url = std::env::var(BASE_URL_ENV).map_err(|_| {
            FeedError::InvalidConfig(format!("{} is not set", BASE_URL_ENV))
        })?;
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            FeedError::InvalidConfig(format!("{} is not set", API_KEY_ENV))
        })?;
        Ok(Self::new(base_url, api_key))
    }

    /// Persist the cache under the given directory
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Set the freshness TTL
    pub fn with_freshness_ttl(mut self, ttl: Duration) -> Self {
        self.freshness_ttl = ttl;
        self
    }

    /// Set the per-entry admission ceiling
    pub fn with_max_entry_bytes(mut self, max_entry_bytes: usize) -> Self {
        self.max_entry_bytes = max_entry_bytes;
        self
    }

    /// Set the footprint status thresholds
    pub fn with_thresholds(mut self, moderate_bytes: u64, near_limit_bytes: u64) -> Self {
        self.moderate_bytes = moderate_bytes;
        self.near_limit_bytes = near_limit_bytes;
        self
    }

    /// Set the fallback window for unrecognized labels
    pub fn with_default_window(mut self, window: TimeWindow) -> Self {
        self.default_window = window;
        self
    }
}
