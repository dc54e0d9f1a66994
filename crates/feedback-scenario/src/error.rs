//! Error types for the scenario model
//!
//! - Block data validation (client-side errors)
//! - Pattern set coverage violations
//! - Profile hash parsing

use crate::scenario::ScenarioKey;

/// Malformed block performance data
///
/// Rejected before anything reaches the orchestrator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Block numbers start at 1
    #[error("block number must be at least 1, got {0}")]
    InvalidBlockNumber(u32),

    /// Accuracy is a percentage
    #[error("accuracy must be within [0, 100], got {0}")]
    AccuracyOutOfRange(f64),

    /// Mean reaction time must be a positive, finite number of milliseconds
    #[error("average reaction time must be positive milliseconds, got {0}")]
    NonPositiveReactionTime(f64),
}

/// Pattern set does not cover every scenario with usable variants
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternSetError {
    /// Scenario key absent
    #[error("missing scenario: {0}")]
    MissingKey(ScenarioKey),

    /// Too few variants for a scenario
    #[error("scenario {key} has {actual} variants, expected {expected}")]
    WrongVariantCount {
        key: ScenarioKey,
        expected: usize,
        actual: usize,
    },

    /// Blank message
    #[error("scenario {key} variant {index} is empty")]
    EmptyVariant { key: ScenarioKey, index: usize },
}

impl PatternSetError {
    /// Scenario the violation was found in
    #[inline]
    #[must_use]
    pub fn key(&self) -> ScenarioKey {
        match self {
            Self::MissingKey(key)
            | Self::WrongVariantCount { key, .. }
            | Self::EmptyVariant { key, .. } => *key,
        }
    }
}

/// String does not name one of the eleven scenarios
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scenario key: '{0}'")]
pub struct UnknownScenarioKey(pub String);

/// Profile hash parsing errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HashError {
    /// Wrong number of bytes
    #[error("invalid hash length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Not hex
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}
