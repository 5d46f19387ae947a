//! Feed view types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::AgentRole;
use crate::directory::AgentRecord;
use crate::source::Message;

/// One role-tagged, sequence-numbered entry in a view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEntry {
    /// The owning agent, snapshotted at aggregation time
    pub agent: AgentRecord,

    /// The agent's classified role
    pub role: AgentRole,

    /// The activity record
    pub message: Message,

    /// Dense 1-based rank within the view; positional metadata only
    pub sequence: usize,
}

/// One aggregated, chronologically ordered activity feed
///
/// Created fresh each run and never mutated; a newer view supersedes it
/// wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationView {
    /// Unique id for this run
    pub id: Uuid,

    /// Label of the window this view answers
    pub window_label: String,

    /// When the view was generated
    pub generated_at: DateTime<Utc>,

    /// Ordered entries
    pub entries: Vec<FeedEntry>,
}

impl ConversationView {
    /// Create a view for the given window label
    pub fn new(window_label: impl Into<String>, entries: Vec<FeedEntry>) -> Self {
        Self {
            id: Uuid::new_v4(),
            window_label: window_label.into(),
            generated_at: Utc::now(),
            entries,
        }
    }

    /// Number of entries in the view
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the view has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count entries per role, in (client, service, broker, unclassified)
    /// order
    pub fn role_counts(&self) -> (usize, usize, usize, usize) {
        let mut counts = (0, 0, 0, 0);
        for entry in &self.entries {
            match entry.role {
                AgentRole::Client => counts.0 += 1,
                AgentRole::Service => counts.1 += 1,
                AgentRole::Broker => counts.2 += 1,
                AgentRole::Unclassified => counts.3 += 1,
            }
        }
        counts
    }
}
