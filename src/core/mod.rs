//! Core types for the feed SDK
//!
//! This module provides the fundamental types used throughout the crate:
//! - `TimeWindow` - Enumerated lookback windows bounding aggregation
//! - `FeedError` - Error types

pub mod error;
pub mod window;

pub use error::{FeedError, FeedResult};
pub use window::TimeWindow;
