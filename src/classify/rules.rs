//! Ordered classification rule table
//!
//! Name rules come before persona rules: name signals are low-noise, while
//! persona text is free-form prose and needs narrower qualifiers to avoid
//! misclassification. Within each group broker is checked first as the most
//! specific role. First matching rule wins.

use serde::{Deserialize, Serialize};

/// Operational role of an agent in the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Requests work from the system
    Client,
    /// Performs work on behalf of clients
    Service,
    /// Coordinates between clients and services
    Broker,
    /// No rule matched
    Unclassified,
}

/// Which text field a rule inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Persona,
}

/// One keyword within a rule.
///
/// A keyword with qualifiers matches only when at least one qualifier also
/// appears in the same field; a keyword without qualifiers matches
/// unconditionally.
struct Keyword {
    term: &'static str,
    qualifiers: &'static [&'static str],
}

const fn plain(term: &'static str) -> Keyword {
    Keyword {
        term,
        qualifiers: &[],
    }
}

const fn qualified(term: &'static str, qualifiers: &'static [&'static str]) -> Keyword {
    Keyword { term, qualifiers }
}

/// One classification rule: field + role + keyword set
struct Rule {
    field: Field,
    role: AgentRole,
    keywords: &'static [Keyword],
}

/// The rule table, in priority order
static RULES: &[Rule] = &[
    Rule {
        field: Field::Name,
        role: AgentRole::Broker,
        keywords: &[
            plain("broker"),
            plain("vow"),
            plain("orchestrat"),
            plain("coordinator"),
        ],
    },
    Rule {
        field: Field::Name,
        role: AgentRole::Service,
        keywords: &[
            plain("service"),
            plain("gpt"),
            plain("claude"),
            plain("api"),
            plain("assistant"),
            plain("model"),
        ],
    },
    Rule {
        field: Field::Name,
        role: AgentRole::Client,
        keywords: &[plain("client"), plain("user"), plain("customer")],
    },
    Rule {
        field: Field::Persona,
        role: AgentRole::Broker,
        keywords: &[
            plain("broker"),
            plain("orchestrat"),
            plain("coordinator"),
            plain("mediator"),
            plain("facilitator"),
            plain("intelligence"),
            plain("brokerage"),
        ],
    },
    Rule {
        field: Field::Persona,
        role: AgentRole::Service,
        keywords: &[
            plain("service"),
            plain("api"),
            plain("model"),
            plain("provider"),
            plain("assistant"),
            plain("helper"),
            plain("llm"),
        ],
    },
    Rule {
        field: Field::Persona,
        role: AgentRole::Client,
        keywords: &[
            plain("client"),
            plain("customer"),
            plain("requester"),
            // "user" and "human" appear in many non-client personas; only
            // accept them alongside client-specific context
            qualified("user", &["request", "need"]),
            qualified("human", &["client", "customer"]),
        ],
    },
];

/// Classify an agent by name and persona text.
///
/// Pure and deterministic: the same inputs always produce the same role.
/// Matching is case-insensitive substring containment.
pub fn classify_agent(name: &str, persona: Option<&str>) -> AgentRole {
    let name = name.to_lowercase();
    let persona = persona.map(str::to_lowercase).unwrap_or_default();

    for rule in RULES {
        let haystack = match rule.field {
            Field::Name => name.as_str(),
            Field::Persona => persona.as_str(),
        };
        if rule.keywords.iter().any(|keyword| matches(haystack, keyword)) {
            return rule.role;
        }
    }

    AgentRole::Unclassified
}

fn matches(haystack: &str, keyword: &Keyword) -> bool {
    if !haystack.contains(keyword.term) {
        return false;
    }
    keyword.qualifiers.is_empty()
        || keyword
            .qualifiers
            .iter()
            .any(|qualifier| haystack.contains(qualifier))
}
