//! Generation engine boundary
//!
//! The generator receives the full profile and the scenario catalog, never
//! block numbers: one pattern set is generated up front and reused across
//! every block of the session.

use crate::config::GenerationConfig;
use crate::error::GenerationError;
use async_trait::async_trait;
use feedback_scenario::{
    ParticipantProfile, RawPatterns, ScenarioDescriptor, ScenarioKey, VARIANTS_PER_KEY,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Everything the generator is told
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Participant preferences
    pub profile: ParticipantProfile,
    /// All scenarios to write messages for
    pub scenario_catalog: Vec<ScenarioDescriptor>,
    /// Messages required per scenario
    pub variants_per_key: usize,
}

impl GenerationRequest {
    /// Request covering the whole catalog, described in the profile language
    #[must_use]
    pub fn for_profile(profile: ParticipantProfile) -> Self {
        let scenario_catalog = ScenarioKey::catalog(profile.language);
        Self {
            profile,
            scenario_catalog,
            variants_per_key: VARIANTS_PER_KEY,
        }
    }
}

/// External text-generation collaborator
#[async_trait]
pub trait FeedbackGenerator: Send + Sync {
    /// Produce messages for every catalog entry
    async fn generate(&self, request: &GenerationRequest) -> Result<RawPatterns, GenerationError>;

    /// Generator name for logs
    fn name(&self) -> &'static str {
        "generator"
    }
}

/// Call the generator with a per-attempt timeout, retrying transient failures
///
/// # Errors
/// The last attempt's error once retries are exhausted, or the first
/// non-transient error.
pub async fn generate_with_retry(
    generator: &dyn FeedbackGenerator,
    request: &GenerationRequest,
    config: &GenerationConfig,
) -> Result<RawPatterns, GenerationError> {
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        let started = Instant::now();

        let result = match tokio::time::timeout(config.timeout(), generator.generate(request)).await
        {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout {
                elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            }),
        };

        match result {
            Ok(raw) => {
                tracing::debug!(
                    generator = generator.name(),
                    attempt,
                    elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "generator returned"
                );
                return Ok(raw);
            }
            Err(e) if e.is_transient() && attempt <= config.max_retries => {
                tracing::warn!(
                    generator = generator.name(),
                    attempt,
                    error = %e,
                    "transient generation failure, retrying"
                );
                tokio::time::sleep(config.retry_backoff()).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedback_scenario::Language;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays a script of results, one per call
    struct Scripted {
        script: Mutex<Vec<Result<RawPatterns, GenerationError>>>,
        calls: AtomicUsize,
        delay: Duration,
    }

    impl Scripted {
        fn new(mut script: Vec<Result<RawPatterns, GenerationError>>) -> Self {
            script.reverse();
            Self {
                script: Mutex::new(script),
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl FeedbackGenerator for Scripted {
        async fn generate(&self, _: &GenerationRequest) -> Result<RawPatterns, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.script
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(GenerationError::Rejected("script exhausted".into())))
        }
    }

    fn fast_config(max_retries: u32) -> GenerationConfig {
        GenerationConfig {
            timeout_ms: 50,
            max_retries,
            retry_backoff_ms: 0,
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::for_profile(ParticipantProfile::new("Mika").with_language(Language::En))
    }

    #[test]
    fn request_carries_whole_catalog() {
        let request = request();
        assert_eq!(request.scenario_catalog.len(), 11);
        assert_eq!(request.variants_per_key, 3);
        assert_eq!(
            request.scenario_catalog[0].description,
            ScenarioKey::RtShortAccUp.description(Language::En)
        );
    }

    #[tokio::test]
    async fn success_on_first_attempt() {
        let generator = Scripted::new(vec![Ok(RawPatterns::new())]);
        let result = generate_with_retry(&generator, &request(), &fast_config(1)).await;
        assert!(result.is_ok());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_failure_once() {
        let generator = Scripted::new(vec![
            Err(GenerationError::Transport("reset".into())),
            Ok(RawPatterns::new()),
        ]);
        let result = generate_with_retry(&generator, &request(), &fast_config(1)).await;
        assert!(result.is_ok());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn gives_up_after_retry_budget() {
        let generator = Scripted::new(vec![
            Err(GenerationError::RateLimited("429".into())),
            Err(GenerationError::RateLimited("429".into())),
            Ok(RawPatterns::new()),
        ]);
        let result = generate_with_retry(&generator, &request(), &fast_config(1)).await;
        assert!(matches!(result, Err(GenerationError::RateLimited(_))));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn does_not_retry_malformed_output() {
        let generator = Scripted::new(vec![
            Err(GenerationError::Malformed("not json".into())),
            Ok(RawPatterns::new()),
        ]);
        let result = generate_with_retry(&generator, &request(), &fast_config(1)).await;
        assert!(matches!(result, Err(GenerationError::Malformed(_))));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn slow_generator_times_out() {
        let mut generator = Scripted::new(vec![Ok(RawPatterns::new()), Ok(RawPatterns::new())]);
        generator.delay = Duration::from_millis(500);

        let result = generate_with_retry(&generator, &request(), &fast_config(1)).await;
        assert!(matches!(result, Err(GenerationError::Timeout { .. })));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }
}
