//! Message Source Adapter
//!
//! Per-agent, best-effort message retrieval. The HTTP adapter walks an
//! ordered list of candidate endpoints until one yields a recognizable
//! payload; exhausting them all produces an empty list, never an error.

pub mod http;
pub mod provider;
pub mod types;

pub use http::HttpMessageSource;
pub use provider::MessageSource;
pub use types::{Message, MessageKind, RawMessage, ToolCall};
