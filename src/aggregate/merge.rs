//! Chronological merge/sort
//!
//! Orders tagged messages from unsynchronized producers into one
//! causally-plausible global sequence.

use chrono::{DateTime, Utc};

use crate::classify::AgentRole;
use crate::directory::AgentRecord;
use crate::source::Message;

use super::view::FeedEntry;

/// Sort key for one message: its best-available timestamp, or the minimum
/// possible instant when absent.
///
/// Timestamp-missing messages therefore sort first. This reproduces the
/// established fallback-to-zero ordering; callers depend on it.
fn sort_key(message: &Message) -> DateTime<Utc> {
    message.timestamp.unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Sort tagged messages ascending by best-available timestamp and assign
/// dense 1-based sequence numbers.
///
/// The sort is stable: equal keys (including all timestamp-missing
/// messages) keep their input order. The key is computed once per message.
pub fn merge_chronological(
    tagged: Vec<(AgentRecord, AgentRole, Message)>,
) -> Vec<FeedEntry> {
    let mut keyed: Vec<(DateTime<Utc>, (AgentRecord, AgentRole, Message))> = tagged
        .into_iter()
        .map(|item| (sort_key(&item.2), item))
        .collect();

    keyed.sort_by_key(|(key, _)| *key);

    keyed
        .into_iter()
        .enumerate()
        .map(|(index, (_, (agent, role, message)))| FeedEntry {
            agent,
            role,
            message,
            sequence: index + 1,
        })
        .collect()
}

/// Assign fresh dense 1-based sequence numbers to already-ordered entries.
///
/// Used when a cached view is re-filtered for a narrower window: the subset
/// keeps its order but must stay densely numbered.
pub fn resequence(mut entries: Vec<FeedEntry>) -> Vec<FeedEntry> {
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.sequence = index + 1;
    }
    entries
}
