//! Cached pattern records

use chrono::{DateTime, Utc};
use feedback_scenario::{FeedbackPatternSet, ParticipantId, ProfileHash};
use serde::{Deserialize, Serialize};

/// The live pattern set of one participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedPatternRecord {
    /// Owner of the record
    pub participant_id: ParticipantId,
    /// Stored messages; may be incomplete if written by an older writer
    pub pattern_set: FeedbackPatternSet,
    /// When the set was generated
    pub generated_at: DateTime<Utc>,
    /// Profile the set was generated from
    pub source_profile_hash: ProfileHash,
}

impl CachedPatternRecord {
    /// Create record stamped with the current time
    #[must_use]
    pub fn new(
        participant_id: ParticipantId,
        pattern_set: FeedbackPatternSet,
        source_profile_hash: ProfileHash,
    ) -> Self {
        Self {
            participant_id,
            pattern_set,
            generated_at: Utc::now(),
            source_profile_hash,
        }
    }

    /// Whether the stored set satisfies the completeness invariant
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pattern_set.is_complete()
    }

    /// Whether the record was generated from the given profile
    #[inline]
    #[must_use]
    pub fn matches_profile(&self, hash: &ProfileHash) -> bool {
        &self.source_profile_hash == hash
    }
}
