//! Agent Role Classifier
//!
//! Maps an agent's name and persona text to one operational role via a
//! priority-ordered rule table. Invoked repeatedly during rendering, so it
//! must stay pure and deterministic.

pub mod rules;

pub use rules::{classify_agent, AgentRole};
