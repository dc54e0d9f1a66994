//! The pattern store boundary

use crate::error::StoreError;
use crate::record::CachedPatternRecord;
use async_trait::async_trait;
use feedback_scenario::{FeedbackPatternSet, ParticipantId, ProfileHash};

/// Keyed persistence of one live pattern set per participant
///
/// Implementations must make `put` an atomic replace: a concurrent `get`
/// observes either the previous record or the new one, never a mix.
#[async_trait]
pub trait PatternStore: Send + Sync {
    /// Live record for a participant
    async fn get(
        &self,
        participant_id: &ParticipantId,
    ) -> Result<Option<CachedPatternRecord>, StoreError>;

    /// Replace the participant's record (last write wins)
    async fn put(
        &self,
        participant_id: &ParticipantId,
        pattern_set: FeedbackPatternSet,
        profile_hash: ProfileHash,
    ) -> Result<(), StoreError>;

    /// Drop the participant's record; returns whether one existed
    async fn remove(&self, participant_id: &ParticipantId) -> Result<bool, StoreError>;

    /// Backend name for logs
    fn name(&self) -> &'static str;
}
