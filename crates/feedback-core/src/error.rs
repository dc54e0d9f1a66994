//! Error types for the feedback engine
//!
//! Only two failure kinds cross the core boundary:
//! - `Validation`: malformed block data (client error)
//! - `Store`: persistence unavailable (server error)
//!
//! [`GenerationError`] is absorbed by the orchestrator and turned into a
//! fallback pattern set; it never reaches a caller as an error.

use feedback_scenario::{PatternSetError, ValidationError};
use feedback_store::StoreError;

/// Main feedback engine error type
#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    /// Invalid block data
    #[error("invalid block data: {0}")]
    Validation(#[from] ValidationError),

    /// Pattern store failed
    #[error("pattern store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl FeedbackError {
    /// Whether the caller sent bad input
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Failures of the external generation engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    /// Attempt exceeded its time budget
    #[error("generation timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// Network or connection failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Engine asked us to back off
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Output could not be parsed
    #[error("malformed generator output: {0}")]
    Malformed(String),

    /// Output parsed but does not cover every scenario
    #[error("incomplete pattern set: {0}")]
    Incomplete(#[from] PatternSetError),

    /// Engine refused the request
    #[error("generator rejected request: {0}")]
    Rejected(String),
}

impl GenerationError {
    /// Check if a retry may succeed
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Transport(_) | Self::RateLimited(_)
        )
    }
}
