//! Feedback Core
//!
//! Generate-or-fetch orchestration of personalized feedback pattern sets.
//!
//! # Architecture
//!
//! ```text
//! FeedbackRequest ──► FeedbackOrchestrator ──┬─► PatternStore      (cache hit)
//!                          │                 ├─► FeedbackGenerator (single flight per participant)
//!                          │                 └─► default set       (generation failed)
//!                          ▼
//!                  FeedbackSelector ──► message for the current block
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use feedback_core::prelude::*;
//!
//! let orchestrator = FeedbackOrchestrator::new(generator, store, FeedbackConfig::default());
//! let response = orchestrator.respond(request).await?;
//! println!("{}", response.message);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod api;
pub mod config;
pub mod error;
pub mod fallback;
pub mod generator;
pub mod orchestrator;
pub mod selector;

// Re-exports
pub use api::{BlockData, FeedbackRequest, FeedbackResponse, PreviousBlock};
pub use config::{
    CacheConfig, FeedbackConfig, GenerationConfig, HttpConfig, LlmConfig, ProfileChangePolicy,
};
pub use error::{FeedbackError, GenerationError};
pub use fallback::{default_pattern_set, neutral_message};
pub use generator::{generate_with_retry, FeedbackGenerator, GenerationRequest};
pub use orchestrator::{FeedbackOrchestrator, OrchestratorStats, Resolution, ResolveRequest};
pub use selector::{variant_index, FeedbackSelector};

/// Commonly used types
pub mod prelude {
    pub use crate::api::{FeedbackRequest, FeedbackResponse};
    pub use crate::config::FeedbackConfig;
    pub use crate::error::{FeedbackError, GenerationError};
    pub use crate::generator::{FeedbackGenerator, GenerationRequest};
    pub use crate::orchestrator::{FeedbackOrchestrator, Resolution, ResolveRequest};
    pub use crate::selector::FeedbackSelector;
    pub use feedback_scenario::{
        BlockPerformance, FeedbackPatternSet, Language, ParticipantId, ParticipantProfile,
        RawPatterns, ScenarioKey,
    };
    pub use feedback_store::{FilePatternStore, MemoryPatternStore, PatternStore};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
