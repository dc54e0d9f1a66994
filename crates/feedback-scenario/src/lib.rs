//! Feedback Scenario Model
//!
//! Value types shared by every layer of the feedback engine.
//!
//! # Core Concepts
//!
//! - [`BlockPerformance`]: Validated accuracy / reaction-time summary of one task block
//! - [`ScenarioKey`]: One of the eleven behavioural scenarios
//! - [`ScenarioClassifier`]: Pure mapping from two blocks to a scenario
//! - [`ParticipantProfile`]: Tone, motivation and evaluation preferences
//! - [`ProfileHash`]: 32-byte Blake3 fingerprint of a profile
//! - [`FeedbackPatternSet`]: Three message variants for every scenario
//!
//! # Example
//!
//! ```rust,ignore
//! use feedback_scenario::{BlockPerformance, ScenarioClassifier, ScenarioKey};
//!
//! let previous = BlockPerformance::new(1, 80.0, 710.0)?;
//! let current = BlockPerformance::new(2, 86.0, 640.0)?;
//!
//! let key = ScenarioClassifier::default().classify(&current, Some(&previous));
//! assert_eq!(key, ScenarioKey::RtShortAccUp);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod classifier;
mod error;
mod hash;
mod patterns;
mod performance;
mod profile;
mod scenario;

// Re-exports
pub use classifier::{
    classify, ClassifierThresholds, PerformanceDelta, ScenarioClassifier,
    NO_PREVIOUS_BLOCK_SCENARIO,
};
pub use error::{HashError, PatternSetError, UnknownScenarioKey, ValidationError};
pub use hash::ProfileHash;
pub use patterns::{FeedbackPatternSet, RawPatterns, VARIANTS_PER_KEY};
pub use performance::BlockPerformance;
pub use profile::{
    EvaluationFocus, Language, MotivationStyle, ParticipantId, ParticipantProfile,
    TonePreference,
};
pub use scenario::{AccAxis, RtAxis, ScenarioDescriptor, ScenarioKey};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
