//! Feedback orchestrator
//!
//! Decides between a cached pattern set, a fresh generation and the default
//! fallback:
//! - Cache hit: complete stored set, returned as is
//! - Miss or forced: one generation flight per participant, shared by every
//!   concurrent caller, persisted on success
//! - Generation failure: language-selected default set, never persisted
//!
//! Flights run on their own task. A caller that goes away does not cancel
//! the flight; its result is still stored for the next request.

use crate::config::{FeedbackConfig, ProfileChangePolicy};
use crate::error::{FeedbackError, GenerationError};
use crate::fallback::default_pattern_set;
use crate::generator::{generate_with_retry, FeedbackGenerator, GenerationRequest};
use crate::selector::FeedbackSelector;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use feedback_scenario::{
    BlockPerformance, FeedbackPatternSet, Language, ParticipantId, ParticipantProfile,
    ProfileHash, ScenarioClassifier, ScenarioKey,
};
use feedback_store::{PatternStore, StoreError};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Input to [`FeedbackOrchestrator::resolve`]
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    /// Known participant; a new id is assigned when absent
    pub participant_id: Option<ParticipantId>,
    /// Generation preferences
    pub profile: ParticipantProfile,
    /// Block just completed
    pub current_block: BlockPerformance,
    /// Block before it, if any
    pub previous_block: Option<BlockPerformance>,
    /// Skip the cache and regenerate
    pub force: bool,
}

impl ResolveRequest {
    /// Create request for a block
    #[must_use]
    pub fn new(profile: ParticipantProfile, current_block: BlockPerformance) -> Self {
        Self {
            participant_id: profile.id.clone(),
            profile,
            current_block,
            previous_block: None,
            force: false,
        }
    }

    /// With participant id
    #[inline]
    #[must_use]
    pub fn with_participant(mut self, id: impl Into<ParticipantId>) -> Self {
        self.participant_id = Some(id.into());
        self
    }

    /// With previous block
    #[inline]
    #[must_use]
    pub fn with_previous(mut self, previous: BlockPerformance) -> Self {
        self.previous_block = Some(previous);
        self
    }

    /// Force regeneration
    #[inline]
    #[must_use]
    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }
}

/// Outcome of [`FeedbackOrchestrator::resolve`]
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Complete pattern set
    pub pattern_set: FeedbackPatternSet,
    /// Served from the store
    pub cached: bool,
    /// Default set served because generation failed
    pub fallback: bool,
    /// Resolved (possibly newly assigned) participant
    pub participant_id: ParticipantId,
    /// Scenario of the supplied blocks
    pub scenario: ScenarioKey,
}

/// Orchestrator counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrchestratorStats {
    /// Requests answered from the store
    pub cache_hits: u64,
    /// Generation flights started
    pub flights_started: u64,
    /// Requests that joined a flight already in progress
    pub flights_joined: u64,
    /// Pattern sets generated and stored
    pub generated: u64,
    /// Flights that ended on the default set
    pub fallbacks: u64,
}

#[derive(Debug, Default)]
struct Counters {
    cache_hits: AtomicU64,
    flights_started: AtomicU64,
    flights_joined: AtomicU64,
    generated: AtomicU64,
    fallbacks: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> OrchestratorStats {
        OrchestratorStats {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            flights_started: self.flights_started.load(Ordering::Relaxed),
            flights_joined: self.flights_joined.load(Ordering::Relaxed),
            generated: self.generated.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone)]
enum FlightOutcome {
    Cached(FeedbackPatternSet),
    Generated(FeedbackPatternSet),
    Fallback(FeedbackPatternSet),
}

type FlightResult = Result<FlightOutcome, StoreError>;
type Flight = Shared<BoxFuture<'static, FlightResult>>;
type FlightMap = DashMap<ParticipantId, InFlight>;

/// Entry for a participant's running flight
struct InFlight {
    token: u64,
    /// Raised by any forced caller; the flight then ignores the store
    force: Arc<AtomicBool>,
    flight: Flight,
}

/// The cache-or-generate orchestrator
///
/// Holds no per-participant state between calls other than the map of
/// generation flights currently in progress.
pub struct FeedbackOrchestrator {
    generator: Arc<dyn FeedbackGenerator>,
    store: Arc<dyn PatternStore>,
    config: Arc<FeedbackConfig>,
    classifier: ScenarioClassifier,
    in_flight: Arc<FlightMap>,
    next_flight: AtomicU64,
    counters: Arc<Counters>,
}

impl FeedbackOrchestrator {
    /// Create orchestrator over injected generator and store
    #[must_use]
    pub fn new(
        generator: Arc<dyn FeedbackGenerator>,
        store: Arc<dyn PatternStore>,
        config: FeedbackConfig,
    ) -> Self {
        Self {
            generator,
            store,
            classifier: ScenarioClassifier::new(config.classifier),
            config: Arc::new(config),
            in_flight: Arc::new(DashMap::new()),
            next_flight: AtomicU64::new(0),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Resolve the pattern set for a participant
    ///
    /// # Workflow
    /// 1. Resolve or assign the participant id
    /// 2. Unless forced, serve a complete stored set
    /// 3. Otherwise join or start the participant's generation flight
    /// 4. Persist a valid generated set
    /// 5. Serve the default set if generation fails
    ///
    /// # Errors
    /// - `FeedbackError::Store` if the store cannot be read or written
    pub async fn resolve(&self, request: ResolveRequest) -> Result<Resolution, FeedbackError> {
        let ResolveRequest {
            participant_id,
            profile,
            current_block,
            previous_block,
            force,
        } = request;

        let participant_id = participant_id
            .filter(|id| !id.as_str().is_empty())
            .or_else(|| profile.id.clone().filter(|id| !id.as_str().is_empty()))
            .unwrap_or_else(|| {
                let id = ParticipantId::generate();
                tracing::info!(participant = %id, "assigned new participant id");
                id
            });

        let scenario = self
            .classifier
            .classify(&current_block, previous_block.as_ref());
        tracing::debug!(participant = %participant_id, %scenario, force, "resolving feedback patterns");

        let profile_hash = profile.profile_hash();

        if !force {
            let policy = self.config.cache.profile_change_policy;
            if let Some(pattern_set) =
                lookup_cached(self.store.as_ref(), &participant_id, &profile_hash, policy).await?
            {
                Counters::bump(&self.counters.cache_hits);
                tracing::debug!(participant = %participant_id, "serving cached pattern set");
                return Ok(Resolution {
                    pattern_set,
                    cached: true,
                    fallback: false,
                    participant_id,
                    scenario,
                });
            }
        }

        let mut outcome = self
            .join_flight(participant_id.clone(), profile.clone(), profile_hash, force)
            .await?;
        // A forced caller that joined a flight which served the store after all
        // needs a generation of its own
        while force && matches!(outcome, FlightOutcome::Cached(_)) {
            tracing::debug!(participant = %participant_id, "joined flight served cache, regenerating");
            outcome = self
                .join_flight(participant_id.clone(), profile.clone(), profile_hash, force)
                .await?;
        }

        let (pattern_set, cached, fallback) = match outcome {
            FlightOutcome::Cached(set) => (set, true, false),
            FlightOutcome::Generated(set) => (set, false, false),
            FlightOutcome::Fallback(set) => (set, false, true),
        };

        Ok(Resolution {
            pattern_set,
            cached,
            fallback,
            participant_id,
            scenario,
        })
    }

    /// Selector sharing this orchestrator's thresholds
    #[inline]
    #[must_use]
    pub fn selector(&self) -> FeedbackSelector {
        FeedbackSelector::new(self.classifier)
    }

    /// Classifier in use
    #[inline]
    #[must_use]
    pub fn classifier(&self) -> &ScenarioClassifier {
        &self.classifier
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &FeedbackConfig {
        &self.config
    }

    /// Get counters
    #[inline]
    #[must_use]
    pub fn stats(&self) -> OrchestratorStats {
        self.counters.snapshot()
    }

    /// Number of generation flights in progress
    #[inline]
    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    async fn join_flight(
        &self,
        participant_id: ParticipantId,
        profile: ParticipantProfile,
        profile_hash: ProfileHash,
        force: bool,
    ) -> FlightResult {
        let flight = match self.in_flight.entry(participant_id.clone()) {
            Entry::Occupied(entry) => {
                Counters::bump(&self.counters.flights_joined);
                tracing::debug!(participant = %participant_id, force, "joining generation in progress");
                let running = entry.get();
                if force {
                    running.force.store(true, Ordering::SeqCst);
                }
                running.flight.clone()
            }
            Entry::Vacant(entry) => {
                let token = self.next_flight.fetch_add(1, Ordering::Relaxed);
                let force = Arc::new(AtomicBool::new(force));
                let flight = self.launch(
                    token,
                    participant_id,
                    profile,
                    profile_hash,
                    Arc::clone(&force),
                );
                entry.insert(InFlight {
                    token,
                    force,
                    flight: flight.clone(),
                });
                flight
            }
        };

        flight.await
    }

    fn launch(
        &self,
        token: u64,
        participant_id: ParticipantId,
        profile: ParticipantProfile,
        profile_hash: ProfileHash,
        force: Arc<AtomicBool>,
    ) -> Flight {
        Counters::bump(&self.counters.flights_started);
        let language = profile.language;

        let task = FlightTask {
            generator: Arc::clone(&self.generator),
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
            counters: Arc::clone(&self.counters),
        };
        let guard = FlightGuard {
            in_flight: Arc::clone(&self.in_flight),
            participant_id: participant_id.clone(),
            token,
        };

        let handle = tokio::spawn(async move {
            let _guard = guard;
            task.run(&participant_id, profile, profile_hash, force).await
        });

        let counters = Arc::clone(&self.counters);
        async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(error = %e, "generation flight aborted, serving default patterns");
                    Counters::bump(&counters.fallbacks);
                    Ok(FlightOutcome::Fallback(default_pattern_set(language)))
                }
            }
        }
        .boxed()
        .shared()
    }
}

impl fmt::Debug for FeedbackOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedbackOrchestrator")
            .field("generator", &self.generator.name())
            .field("store", &self.store.name())
            .field("config", &self.config)
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}

/// Stored set if present, complete, and acceptable under the policy
async fn lookup_cached(
    store: &dyn PatternStore,
    participant_id: &ParticipantId,
    profile_hash: &ProfileHash,
    policy: ProfileChangePolicy,
) -> Result<Option<FeedbackPatternSet>, StoreError> {
    let record = match store.get(participant_id).await {
        Ok(Some(record)) => record,
        Ok(None) => return Ok(None),
        Err(e) => {
            tracing::error!(participant = %participant_id, error = %e, "pattern store read failed");
            return Err(e);
        }
    };

    if let Err(e) = record.pattern_set.validate() {
        tracing::warn!(participant = %participant_id, error = %e, "stored pattern set incomplete");
        return Ok(None);
    }

    if policy == ProfileChangePolicy::Regenerate && !record.matches_profile(profile_hash) {
        tracing::info!(
            participant = %participant_id,
            stored = %record.source_profile_hash.short(),
            current = %profile_hash.short(),
            "profile changed since generation"
        );
        return Ok(None);
    }

    Ok(Some(record.pattern_set))
}

/// Removes the flight entry when the flight task ends, even by panic
struct FlightGuard {
    in_flight: Arc<FlightMap>,
    participant_id: ParticipantId,
    token: u64,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.in_flight
            .remove_if(&self.participant_id, |_, running| running.token == self.token);
    }
}

/// State a flight needs once detached from the orchestrator
struct FlightTask {
    generator: Arc<dyn FeedbackGenerator>,
    store: Arc<dyn PatternStore>,
    config: Arc<FeedbackConfig>,
    counters: Arc<Counters>,
}

impl FlightTask {
    async fn run(
        &self,
        participant_id: &ParticipantId,
        profile: ParticipantProfile,
        profile_hash: ProfileHash,
        force: Arc<AtomicBool>,
    ) -> FlightResult {
        // A flight that just finished may have stored a set after our caller's miss.
        // A forced caller may join while the lookup is pending, so check again after it.
        if !force.load(Ordering::SeqCst) {
            let policy = self.config.cache.profile_change_policy;
            if let Some(set) =
                lookup_cached(self.store.as_ref(), participant_id, &profile_hash, policy).await?
            {
                if !force.load(Ordering::SeqCst) {
                    Counters::bump(&self.counters.cache_hits);
                    return Ok(FlightOutcome::Cached(set));
                }
            }
        }
        let force = force.load(Ordering::SeqCst);

        let language = profile.language;
        let request = GenerationRequest::for_profile(profile);
        tracing::info!(
            participant = %participant_id,
            generator = self.generator.name(),
            force,
            "generating feedback patterns"
        );

        let generated = generate_with_retry(self.generator.as_ref(), &request, &self.config.generation)
            .await
            .and_then(|raw| FeedbackPatternSet::from_raw(&raw).map_err(GenerationError::from));

        match generated {
            Ok(set) => {
                if let Err(e) = self
                    .store
                    .put(participant_id, set.clone(), profile_hash)
                    .await
                {
                    tracing::error!(participant = %participant_id, error = %e, "pattern store write failed");
                    return Err(e);
                }
                Counters::bump(&self.counters.generated);
                tracing::info!(participant = %participant_id, "stored generated pattern set");
                Ok(FlightOutcome::Generated(set))
            }
            Err(e) => Ok(self.fallback(participant_id, language, &e)),
        }
    }

    fn fallback(
        &self,
        participant_id: &ParticipantId,
        language: Language,
        error: &GenerationError,
    ) -> FlightOutcome {
        Counters::bump(&self.counters.fallbacks);
        tracing::warn!(
            participant = %participant_id,
            %language,
            error = %error,
            "generation failed, serving default patterns"
        );
        FlightOutcome::Fallback(default_pattern_set(language))
    }
}
