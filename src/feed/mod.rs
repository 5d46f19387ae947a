//! Feed service facade
//!
//! `FeedService` ties the directory, source adapter, aggregator, and cache
//! manager together behind the one operation the dashboard calls, with
//! session-scoped lifetime and explicit invalidation.

pub mod config;
pub mod service;

pub use config::FeedConfig;
pub use service::FeedService;
