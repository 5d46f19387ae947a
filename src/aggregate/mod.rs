//! Aggregation pipeline
//!
//! Fans the message source out across every known agent, drops
//! administrative records, applies the window cutoff, and merges the
//! survivors into one chronologically ordered, role-tagged view.

pub mod aggregator;
pub mod merge;
pub mod view;

pub use aggregator::Aggregator;
pub use merge::merge_chronological;
pub use view::{ConversationView, FeedEntry};
