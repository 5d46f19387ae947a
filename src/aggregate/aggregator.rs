//! Feed aggregator
//!
//! One aggregation pass: list every known agent, fan the message source out
//! across them concurrently, tag and filter the results, and merge them
//! into a single chronologically ordered view.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;

use crate::classify::classify_agent;
use crate::core::{FeedError, FeedResult, TimeWindow};
use crate::directory::{AgentDirectory, AgentRecord};
use crate::source::{Message, MessageKind, MessageSource};

use super::merge::merge_chronological;
use super::view::ConversationView;

/// Aggregates per-agent histories into one feed view
pub struct Aggregator {
    directory: Arc<dyn AgentDirectory>,
    source: Arc<dyn MessageSource>,
}

impl Aggregator {
    /// Create an aggregator over the given collaborators
    pub fn new(directory: Arc<dyn AgentDirectory>, source: Arc<dyn MessageSource>) -> Self {
        Self { directory, source }
    }

    /// Run one aggregation pass for the given window.
    ///
    /// Directory failure is fatal; every per-agent failure is isolated and
    /// recovered as an empty history. Read-only with respect to all
    /// entities.
    pub async fn collect(&self, window: TimeWindow) -> FeedResult<ConversationView> {
        let agents = self
            .directory
            .list_agents()
            .await
            .map_err(|err| FeedError::DirectoryUnavailable(err.to_string()))?;

        let cutoff = window.cutoff(Utc::now());
        tracing::info!(
            "Aggregating {} window across {} agents (cutoff {})",
            window,
            agents.len(),
            cutoff
        );

        // Concurrent fan-out; each agent's fetch is independent and cannot
        // cancel or delay its peers
        let fetches = agents.into_iter().map(|agent| {
            let source = Arc::clone(&self.source);
            async move {
                let messages = source.fetch_messages(&agent.id).await;
                (agent, messages)
            }
        });
        let results: Vec<(AgentRecord, Vec<Message>)> = join_all(fetches).await;

        let mut tagged = Vec::new();
        for (agent, messages) in results {
            let role = classify_agent(&agent.name, agent.persona.as_deref());
            for message in messages {
                if !retain_message(&message, cutoff) {
                    continue;
                }
                tagged.push((agent.clone(), role, message));
            }
        }

        tracing::debug!("{} messages survive filtering", tagged.len());

        let entries = merge_chronological(tagged);
        Ok(ConversationView::new(window.label(), entries))
    }
}

/// Window predicate: system messages are always excluded; a defined
/// timestamp older than the cutoff excludes the message; a missing
/// timestamp is never treated as evidence of staleness.
pub fn retain_message(message: &Message, cutoff: DateTime<Utc>) -> bool {
    if message.kind == MessageKind::System {
        return false;
    }
    match message.timestamp {
        Some(timestamp) => timestamp >= cutoff,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use chrono::Duration;
    use std::collections::HashMap;

    struct FixedDirectory {
        agents: Vec<AgentRecord>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl AgentDirectory for FixedDirectory {
        async fn list_agents(&self) -> Result<Vec<AgentRecord>> {
            if self.fail {
                anyhow::bail!("directory offline");
            }
            Ok(self.agents.clone())
        }
    }

    struct FixedSource {
        by_agent: HashMap<String, Vec<Message>>,
    }

    #[async_trait::async_trait]
    impl MessageSource for FixedSource {
        async fn fetch_messages(&self, agent_id: &str) -> Vec<Message> {
            self.by_agent.get(agent_id).cloned().unwrap_or_default()
        }
    }

    fn stamped(id: &str, agent_id: &str, kind: MessageKind, age: Duration) -> Message {
        Message::new(id, agent_id, kind).with_timestamp(Utc::now() - age)
    }

    fn aggregator(
        agents: Vec<AgentRecord>,
        by_agent: HashMap<String, Vec<Message>>,
    ) -> Aggregator {
        Aggregator::new(
            Arc::new(FixedDirectory {
                agents,
                fail: false,
            }),
            Arc::new(FixedSource { by_agent }),
        )
    }

    #[tokio::test]
    async fn test_collect_tags_filters_and_orders() {
        // Agent1 succeeds with 5 messages, Agent2 has nothing (all its
        // candidates failed upstream), Agent3 has 2 of which one is system
        let agents = vec![
            AgentRecord::new("a1", "ClientBot"),
            AgentRecord::new("a2", "GPT-Service"),
            AgentRecord::new("a3", "VowBroker"),
        ];

        let mut by_agent = HashMap::new();
        by_agent.insert(
            "a1".to_string(),
            (0..5i64)
                .map(|i| {
                    stamped(
                        &format!("m{}", i),
                        "a1",
                        MessageKind::User,
                        Duration::minutes(50 - i),
                    )
                })
                .collect(),
        );
        by_agent.insert(
            "a3".to_string(),
            vec![
                stamped("m5", "a3", MessageKind::Assistant, Duration::minutes(10)),
                stamped("m6", "a3", MessageKind::System, Duration::minutes(5)),
            ],
        );

        let view = aggregator(agents, by_agent)
            .collect(TimeWindow::OneDay)
            .await
            .unwrap();

        // 5 + 0 + (2 - 1 system) = 6 messages
        assert_eq!(view.len(), 6);
        let sequences: Vec<usize> = view.entries.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4, 5, 6]);

        // Ascending timestamps
        for pair in view.entries.windows(2) {
            assert!(pair[0].message.timestamp <= pair[1].message.timestamp);
        }

        // Every entry belongs to a known agent and none are system records
        for entry in &view.entries {
            assert!(["a1", "a2", "a3"].contains(&entry.message.agent_id.as_str()));
            assert_ne!(entry.message.kind, MessageKind::System);
        }
    }

    #[tokio::test]
    async fn test_collect_applies_cutoff_but_keeps_unstamped() {
        let agents = vec![AgentRecord::new("a1", "ClientBot")];
        let mut by_agent = HashMap::new();
        by_agent.insert(
            "a1".to_string(),
            vec![
                stamped("recent", "a1", MessageKind::User, Duration::minutes(30)),
                stamped("ancient", "a1", MessageKind::User, Duration::days(2)),
                Message::new("unstamped", "a1", MessageKind::User),
            ],
        );

        let view = aggregator(agents, by_agent)
            .collect(TimeWindow::OneHour)
            .await
            .unwrap();

        let ids: Vec<&str> = view.entries.iter().map(|e| e.message.id.as_str()).collect();
        // Unstamped sorts first, ancient is cut off
        assert_eq!(ids, vec!["unstamped", "recent"]);
    }

    #[tokio::test]
    async fn test_collect_tags_roles() {
        let agents = vec![
            AgentRecord::new("a1", "BrokerBot").with_persona("client"),
            AgentRecord::new("a2", "plain").with_persona("I am a client requester"),
        ];
        let mut by_agent = HashMap::new();
        for id in ["a1", "a2"] {
            by_agent.insert(
                id.to_string(),
                vec![stamped("m", id, MessageKind::Assistant, Duration::minutes(1))],
            );
        }

        let view = aggregator(agents, by_agent)
            .collect(TimeWindow::OneDay)
            .await
            .unwrap();

        let roles: HashMap<&str, crate::classify::AgentRole> = view
            .entries
            .iter()
            .map(|e| (e.message.agent_id.as_str(), e.role))
            .collect();
        assert_eq!(roles["a1"], crate::classify::AgentRole::Broker);
        assert_eq!(roles["a2"], crate::classify::AgentRole::Client);
    }

    #[tokio::test]
    async fn test_directory_failure_is_fatal() {
        let aggregator = Aggregator::new(
            Arc::new(FixedDirectory {
                agents: vec![],
                fail: true,
            }),
            Arc::new(FixedSource {
                by_agent: HashMap::new(),
            }),
        );

        let err = aggregator.collect(TimeWindow::OneDay).await.unwrap_err();
        assert!(matches!(err, FeedError::DirectoryUnavailable(_)));
    }

    #[test]
    fn test_retain_message_predicate() {
        let cutoff = Utc::now() - Duration::hours(1);

        let system = Message::new("s", "a", MessageKind::System)
            .with_timestamp(Utc::now());
        assert!(!retain_message(&system, cutoff));

        let fresh = Message::new("f", "a", MessageKind::User).with_timestamp(Utc::now());
        assert!(retain_message(&fresh, cutoff));

        let stale = Message::new("o", "a", MessageKind::User)
            .with_timestamp(Utc::now() - Duration::hours(2));
        assert!(!retain_message(&stale, cutoff));

        let unstamped = Message::new("u", "a", MessageKind::User);
        assert!(retain_message(&unstamped, cutoff));
    }
}
