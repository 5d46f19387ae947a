//! Message wire and domain types
//!
//! The platform reports messages under several payload shapes and several
//! timestamp field names. `RawMessage` accepts what the wire sends;
//! `Message` is the normalized shape everything downstream consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Normalized message
// ============================================================================

/// The kind of activity a message records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Operator or upstream user input
    User,
    /// Agent reply
    Assistant,
    /// Agent inner reasoning
    Reasoning,
    /// Tool invocation request
    ToolCall,
    /// Tool invocation result
    ToolReturn,
    /// Platform housekeeping; always excluded from the feed
    System,
}

impl MessageKind {
    /// Parse a wire `message_type` string
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "user_message" => Some(MessageKind::User),
            "assistant_message" => Some(MessageKind::Assistant),
            "reasoning_message" => Some(MessageKind::Reasoning),
            "tool_call_message" => Some(MessageKind::ToolCall),
            "tool_return_message" => Some(MessageKind::ToolReturn),
            "system_message" => Some(MessageKind::System),
            _ => None,
        }
    }
}

/// A tool invocation carried by a `ToolCall` message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool name
    pub name: String,

    /// Invocation arguments as reported by the platform
    #[serde(default)]
    pub arguments: Value,
}

/// One normalized activity record belonging to an agent
///
/// Immutable downstream of the source adapter. Every message belongs to
/// exactly one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Platform message id
    pub id: String,

    /// Owning agent id
    pub agent_id: String,

    /// Activity kind
    pub kind: MessageKind,

    /// Text content (user/assistant messages)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Reasoning content (reasoning messages)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,

    /// Tool invocation (tool_call messages)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCall>,

    /// Tool result (tool_return messages)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_return: Option<String>,

    /// Best-available timestamp; absent when the wire carried none that
    /// parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Message {
    /// Create a minimal message for the given agent and kind
    pub fn new(id: impl Into<String>, agent_id: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            id: id.into(),
            agent_id: agent_id.into(),
            kind,
            text: None,
            reasoning: None,
            tool_call: None,
            tool_return: None,
            timestamp: None,
        }
    }

    /// Set the text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

// ============================================================================
// Wire message
// ============================================================================

/// Raw message payload as the platform sends it
///
/// The timestamp may appear under any of `created_at`, `date`, or
/// `timestamp`; normalization probes them in that priority order and takes
/// the first one that parses.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMessage {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message_type: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub tool_call: Option<RawToolCall>,
    #[serde(default)]
    pub tool_return: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Raw tool invocation payload
#[derive(Debug, Clone, Deserialize)]
pub struct RawToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl RawMessage {
    /// Normalize into a `Message` owned by `agent_id`.
    ///
    /// Returns `None` when the wire kind is missing or unrecognized; such
    /// records are dropped with a debug log rather than forced into a wrong
    /// kind. Malformed timestamps count as missing, never as an error.
    pub fn normalize(self, agent_id: &str) -> Option<Message> {
        let raw_kind = self.message_type.as_deref().unwrap_or("");
        let kind = match MessageKind::parse(raw_kind) {
            Some(kind) => kind,
            None => {
                tracing::debug!("Dropping message with unrecognized kind: {:?}", raw_kind);
                return None;
            }
        };

        let timestamp = [&self.created_at, &self.date, &self.timestamp]
            .into_iter()
            .flatten()
            .find_map(|raw| parse_timestamp(raw));

        Some(Message {
            id: self.id.unwrap_or_default(),
            agent_id: agent_id.to_string(),
            kind,
            text: self.content,
            reasoning: self.reasoning,
            tool_call: self.tool_call.map(|raw| ToolCall {
                name: raw.name,
                arguments: raw.arguments,
            }),
            tool_return: self.tool_return,
            timestamp,
        })
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_user_message() {
        let raw: RawMessage = serde_json::from_str(
            r#"{
                "id": "msg-1",
                "message_type": "user_message",
                "content": "hello",
                "created_at": "2025-06-01T10:00:00Z"
            }"#,
        )
        .unwrap();

        let msg = raw.normalize("agent-1").unwrap();
        assert_eq!(msg.kind, MessageKind::User);
        assert_eq!(msg.agent_id, "agent-1");
        assert_eq!(msg.text.as_deref(), Some("hello"));
        assert!(msg.timestamp.is_some());
    }

    #[test]
    fn test_normalize_tool_call() {
        let raw: RawMessage = serde_json::from_str(
            r#"{
                "id": "msg-2",
                "message_type": "tool_call_message",
                "tool_call": {"name": "send_message", "arguments": {"text": "hi"}}
            }"#,
        )
        .unwrap();

        let msg = raw.normalize("agent-1").unwrap();
        assert_eq!(msg.kind, MessageKind::ToolCall);
        assert_eq!(msg.tool_call.as_ref().unwrap().name, "send_message");
        assert!(msg.timestamp.is_none());
    }

    #[test]
    fn test_timestamp_candidate_priority() {
        // created_at wins over date and timestamp
        let raw: RawMessage = serde_json::from_str(
            r#"{
                "id": "msg-3",
                "message_type": "assistant_message",
                "created_at": "2025-06-01T10:00:00Z",
                "date": "2025-06-02T10:00:00Z",
                "timestamp": "2025-06-03T10:00:00Z"
            }"#,
        )
        .unwrap();

        let msg = raw.normalize("agent-1").unwrap();
        assert_eq!(
            msg.timestamp.unwrap().to_rfc3339(),
            "2025-06-01T10:00:00+00:00"
        );
    }

    #[test]
    fn test_malformed_created_at_falls_through_to_date() {
        let raw: RawMessage = serde_json::from_str(
            r#"{
                "id": "msg-4",
                "message_type": "assistant_message",
                "created_at": "not a time",
                "date": "2025-06-02T10:00:00Z"
            }"#,
        )
        .unwrap();

        let msg = raw.normalize("agent-1").unwrap();
        assert_eq!(
            msg.timestamp.unwrap().to_rfc3339(),
            "2025-06-02T10:00:00+00:00"
        );
    }

    #[test]
    fn test_unrecognized_kind_is_dropped() {
        let raw: RawMessage = serde_json::from_str(
            r#"{"id": "msg-5", "message_type": "heartbeat_message"}"#,
        )
        .unwrap();
        assert!(raw.normalize("agent-1").is_none());

        let raw: RawMessage = serde_json::from_str(r#"{"id": "msg-6"}"#).unwrap();
        assert!(raw.normalize("agent-1").is_none());
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(MessageKind::parse("system_message"), Some(MessageKind::System));
        assert_eq!(MessageKind::parse("tool_return_message"), Some(MessageKind::ToolReturn));
        assert_eq!(MessageKind::parse("unknown"), None);
    }
}
