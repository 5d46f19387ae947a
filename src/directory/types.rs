//! Agent directory wire and domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A known agent, as seen by one aggregation pass
///
/// Read-only snapshot: the aggregator owns it for the duration of a pass and
/// never writes back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Stable opaque key
    pub id: String,

    /// Display name
    pub name: String,

    /// Free-text persona, if the agent carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,

    /// Creation time, if reported by the platform
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl AgentRecord {
    /// Create a record with just an id and name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            persona: None,
            created_at: None,
        }
    }

    /// Set the persona text
    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = Some(persona.into());
        self
    }
}

/// Raw agent payload from the platform's listing endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RawAgent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub memory: Option<RawMemory>,
}

/// Raw agent memory: a set of labeled blocks
#[derive(Debug, Clone, Deserialize)]
pub struct RawMemory {
    #[serde(default)]
    pub blocks: Vec<RawMemoryBlock>,
}

/// One labeled memory block ("persona", "human", ...)
#[derive(Debug, Clone, Deserialize)]
pub struct RawMemoryBlock {
    pub label: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl RawAgent {
    /// Normalize into an `AgentRecord`, pulling the persona out of the
    /// labeled memory blocks
    pub fn normalize(self) -> AgentRecord {
        let persona = self.memory.as_ref().and_then(|memory| {
            memory
                .blocks
                .iter()
                .find(|block| block.label == "persona")
                .and_then(|block| block.value.clone())
        });

        let created_at = self
            .created_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|parsed| parsed.with_timezone(&Utc));

        AgentRecord {
            id: self.id,
            name: self.name,
            persona,
            created_at,
        }
    }
}
