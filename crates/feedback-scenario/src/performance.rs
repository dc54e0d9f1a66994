//! Block performance summaries
//!
//! One [`BlockPerformance`] is produced per completed block by the trial
//! engine. Values are validated once at construction and immutable after.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Accuracy and mean reaction time of one task block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawBlockPerformance")]
pub struct BlockPerformance {
    block_number: u32,
    accuracy: f64,
    #[serde(rename = "averageRT")]
    average_rt: f64,
}

impl BlockPerformance {
    /// Create validated block summary
    ///
    /// # Errors
    /// - `ValidationError::InvalidBlockNumber` if `block_number` is 0
    /// - `ValidationError::AccuracyOutOfRange` if accuracy is outside [0, 100] or NaN
    /// - `ValidationError::NonPositiveReactionTime` if RT is not a positive finite number
    pub fn new(block_number: u32, accuracy: f64, average_rt: f64) -> Result<Self, ValidationError> {
        if block_number == 0 {
            return Err(ValidationError::InvalidBlockNumber(block_number));
        }
        if !(0.0..=100.0).contains(&accuracy) {
            return Err(ValidationError::AccuracyOutOfRange(accuracy));
        }
        if !average_rt.is_finite() || average_rt <= 0.0 {
            return Err(ValidationError::NonPositiveReactionTime(average_rt));
        }

        Ok(Self {
            block_number,
            accuracy,
            average_rt,
        })
    }

    /// Block number (1-based)
    #[inline]
    #[must_use]
    pub fn block_number(&self) -> u32 {
        self.block_number
    }

    /// Accuracy in percent
    #[inline]
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Mean reaction time in milliseconds
    #[inline]
    #[must_use]
    pub fn average_rt(&self) -> f64 {
        self.average_rt
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlockPerformance {
    block_number: u32,
    accuracy: f64,
    #[serde(rename = "averageRT")]
    average_rt: f64,
}

impl TryFrom<RawBlockPerformance> for BlockPerformance {
    type Error = ValidationError;

    fn try_from(raw: RawBlockPerformance) -> Result<Self, Self::Error> {
        Self::new(raw.block_number, raw.accuracy, raw.average_rt)
    }
}
