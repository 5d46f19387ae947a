//! Agent Directory collaborator
//!
//! The directory is the one listing operation the aggregator depends on:
//! all known agents, with display name and persona text. It is the only
//! collaborator whose failure is fatal to a feed request.

pub mod client;
pub mod types;

pub use client::{AgentDirectory, HttpAgentDirectory};
pub use types::AgentRecord;
