//! Feed SDK error types

use thiserror::Error;

/// Errors that can occur in the feed SDK
#[derive(Error, Debug)]
pub enum FeedError {
    /// Agent directory could not be listed; fatal to the request
    #[error("Agent directory unavailable: {0}")]
    DirectoryUnavailable(String),

    /// Cache store rejected a write because the backing quota is exhausted
    #[error("Cache quota exceeded: {0}")]
    CacheQuota(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl FeedError {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        FeedError::Other(msg.into())
    }

    /// Create a directory-unavailable error
    pub fn directory(msg: impl Into<String>) -> Self {
        FeedError::DirectoryUnavailable(msg.into())
    }

    /// Whether this error came from quota pressure on the cache store
    pub fn is_quota(&self) -> bool {
        matches!(self, FeedError::CacheQuota(_))
    }
}

/// Result type alias for feed SDK operations
pub type FeedResult<T> = Result<T, FeedError>;
