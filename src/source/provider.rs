//! Message source trait
//!
//! Abstracts per-agent message retrieval so the aggregator can run against
//! the real platform API or an in-memory double in tests.

use super::types::Message;

/// Trait for per-agent message retrieval.
///
/// Best-effort contract: implementations return whatever messages they could
/// recover for the agent, or an empty list. They never fail the caller — a
/// single agent's unavailability must not abort the broader aggregation.
#[async_trait::async_trait]
pub trait MessageSource: Send + Sync {
    /// Fetch the complete message list for one agent, or empty on failure
    async fn fetch_messages(&self, agent_id: &str) -> Vec<Message>;
}
