//! Error types for the feed state core.

use thiserror::Error;

/// Main error type for feed state operations.
///
/// Missing records are not errors: collection operations report "not found"
/// through their return values.
#[derive(Debug, Error)]
pub enum FeedsError {
    #[error("Invalid feed id: {0:?} (expected \"group:id\")")]
    InvalidFeedId(String),

    #[error("Capability fetch failed: {0}")]
    CapabilityFetch(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Event publisher has been released")]
    PublisherClosed,

    #[error("No async runtime available to run detached work")]
    NoRuntime,
}

impl From<serde_json::Error> for FeedsError {
    fn from(e: serde_json::Error) -> Self {
        FeedsError::Serialization(e.to_string())
    }
}

/// Result type for feed state operations.
pub type Result<T> = std::result::Result<T, FeedsError>;
