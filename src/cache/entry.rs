//! Cached view entries

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::ConversationView;

/// One stored view for one window
///
/// Always replaced wholesale, never partially updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Window label this entry answers
    pub window_label: String,

    /// When the entry was written
    pub stored_at: DateTime<Utc>,

    /// The serialized view
    pub view: ConversationView,
}

impl CacheEntry {
    /// Create an entry stored now
    pub fn new(window_label: impl Into<String>, view: ConversationView) -> Self {
        Self {
            window_label: window_label.into(),
            stored_at: Utc::now(),
            view,
        }
    }

    /// Whether the entry is younger than the freshness TTL
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.stored_at < ttl
    }
}
