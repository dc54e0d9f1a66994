//! Scenario classification
//!
//! Maps a pair of block summaries onto a [`ScenarioKey`]. Pure and total:
//! no I/O, no clock, every input pair yields exactly one key.
//!
//! Every threshold comparison is inclusive, so a delta sitting exactly on a
//! threshold always falls into the changing bucket.

use crate::performance::BlockPerformance;
use crate::scenario::{AccAxis, RtAxis, ScenarioKey};
use serde::{Deserialize, Serialize};

/// Scenario used when there is no previous block to compare against
pub const NO_PREVIOUS_BLOCK_SCENARIO: ScenarioKey = ScenarioKey::RtSameAccSame;

/// Classification thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    /// RT change (ms) that counts as faster/slower
    pub rt_threshold_ms: f64,
    /// Accuracy change (percentage points) that counts as up/down
    pub acc_threshold: f64,
    /// RT increase (ms) required for the fatigue scenario
    pub large_rt_threshold_ms: f64,
    /// Accuracy change (percentage points) required for synergy/fatigue
    pub large_acc_threshold: f64,
}

impl ClassifierThresholds {
    /// Default RT threshold in milliseconds
    pub const RT_THRESHOLD_MS: f64 = 30.0;
    /// Default accuracy threshold in percentage points
    pub const ACC_THRESHOLD: f64 = 5.0;
    /// Default large RT threshold in milliseconds
    pub const LARGE_RT_THRESHOLD_MS: f64 = 80.0;
    /// Default large accuracy threshold in percentage points
    pub const LARGE_ACC_THRESHOLD: f64 = 10.0;
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            rt_threshold_ms: Self::RT_THRESHOLD_MS,
            acc_threshold: Self::ACC_THRESHOLD,
            large_rt_threshold_ms: Self::LARGE_RT_THRESHOLD_MS,
            large_acc_threshold: Self::LARGE_ACC_THRESHOLD,
        }
    }
}

/// Change from the previous block to the current one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceDelta {
    /// `current.average_rt - previous.average_rt`
    pub rt_delta_ms: f64,
    /// `current.accuracy - previous.accuracy`
    pub acc_delta: f64,
}

impl PerformanceDelta {
    /// Compute delta between two blocks
    #[inline]
    #[must_use]
    pub fn between(current: &BlockPerformance, previous: &BlockPerformance) -> Self {
        Self {
            rt_delta_ms: current.average_rt() - previous.average_rt(),
            acc_delta: current.accuracy() - previous.accuracy(),
        }
    }
}

/// Deterministic block-pair classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioClassifier {
    thresholds: ClassifierThresholds,
    no_previous: ScenarioKey,
}

impl ScenarioClassifier {
    /// Create classifier with thresholds
    #[inline]
    #[must_use]
    pub fn new(thresholds: ClassifierThresholds) -> Self {
        Self {
            thresholds,
            no_previous: NO_PREVIOUS_BLOCK_SCENARIO,
        }
    }

    /// Override the scenario returned for a first block
    #[inline]
    #[must_use]
    pub fn with_no_previous_scenario(mut self, key: ScenarioKey) -> Self {
        self.no_previous = key;
        self
    }

    /// Get thresholds
    #[inline]
    #[must_use]
    pub fn thresholds(&self) -> &ClassifierThresholds {
        &self.thresholds
    }

    /// Classify current block against the previous one
    #[must_use]
    pub fn classify(
        &self,
        current: &BlockPerformance,
        previous: Option<&BlockPerformance>,
    ) -> ScenarioKey {
        match previous {
            Some(previous) => self.classify_delta(PerformanceDelta::between(current, previous)),
            None => self.no_previous,
        }
    }

    /// Classify a precomputed delta
    #[must_use]
    pub fn classify_delta(&self, delta: PerformanceDelta) -> ScenarioKey {
        let t = &self.thresholds;
        let rt = self.rt_axis(delta.rt_delta_ms);
        let acc = self.acc_axis(delta.acc_delta);

        // Composite scenarios shadow their grid cell
        if rt == RtAxis::Short && delta.acc_delta >= t.large_acc_threshold {
            return ScenarioKey::RtShortAccUpSynergy;
        }
        if rt == RtAxis::Slow
            && delta.rt_delta_ms >= t.large_rt_threshold_ms
            && delta.acc_delta <= -t.large_acc_threshold
        {
            return ScenarioKey::RtSlowAccDownFatigue;
        }

        ScenarioKey::grid(rt, acc)
    }

    /// RT axis bucket for a delta
    #[inline]
    #[must_use]
    pub fn rt_axis(&self, rt_delta_ms: f64) -> RtAxis {
        if rt_delta_ms <= -self.thresholds.rt_threshold_ms {
            RtAxis::Short
        } else if rt_delta_ms >= self.thresholds.rt_threshold_ms {
            RtAxis::Slow
        } else {
            RtAxis::Same
        }
    }

    /// Accuracy axis bucket for a delta
    #[inline]
    #[must_use]
    pub fn acc_axis(&self, acc_delta: f64) -> AccAxis {
        if acc_delta >= self.thresholds.acc_threshold {
            AccAxis::Up
        } else if acc_delta <= -self.thresholds.acc_threshold {
            AccAxis::Down
        } else {
            AccAxis::Same
        }
    }
}

impl Default for ScenarioClassifier {
    fn default() -> Self {
        Self::new(ClassifierThresholds::default())
    }
}

/// Classify with default thresholds
#[inline]
#[must_use]
pub fn classify(current: &BlockPerformance, previous: Option<&BlockPerformance>) -> ScenarioKey {
    ScenarioClassifier::default().classify(current, previous)
}
