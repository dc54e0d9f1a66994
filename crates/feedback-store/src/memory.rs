//! In-process pattern store using moka
//!
//! Records are held as `Arc<CachedPatternRecord>`, so a `put` swaps a single
//! pointer and readers never observe a partially written record.

use crate::error::StoreError;
use crate::record::CachedPatternRecord;
use crate::store::PatternStore;
use async_trait::async_trait;
use feedback_scenario::{FeedbackPatternSet, ParticipantId, ProfileHash};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Process-local pattern store
#[derive(Debug, Clone)]
pub struct MemoryPatternStore {
    inner: Cache<ParticipantId, Arc<CachedPatternRecord>>,
}

impl MemoryPatternStore {
    /// Create store holding at most `max_capacity` participants
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Create store whose records expire after `ttl`
    #[inline]
    #[must_use]
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Store an already-built record as is
    ///
    /// Used to seed fixtures and to import records from another backend.
    pub async fn insert_record(&self, record: CachedPatternRecord) {
        self.inner
            .insert(record.participant_id.clone(), Arc::new(record))
            .await;
    }

    /// Number of participants with a live record
    pub async fn len(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }

    /// Whether no participant has a record
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryPatternStore {
    /// Create store with default capacity (10,000 participants)
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl PatternStore for MemoryPatternStore {
    async fn get(
        &self,
        participant_id: &ParticipantId,
    ) -> Result<Option<CachedPatternRecord>, StoreError> {
        Ok(self
            .inner
            .get(participant_id)
            .await
            .map(|record| record.as_ref().clone()))
    }

    async fn put(
        &self,
        participant_id: &ParticipantId,
        pattern_set: FeedbackPatternSet,
        profile_hash: ProfileHash,
    ) -> Result<(), StoreError> {
        let record = CachedPatternRecord::new(participant_id.clone(), pattern_set, profile_hash);
        self.inner
            .insert(participant_id.clone(), Arc::new(record))
            .await;
        tracing::debug!(participant = %participant_id, "stored pattern set in memory");
        Ok(())
    }

    async fn remove(&self, participant_id: &ParticipantId) -> Result<bool, StoreError> {
        Ok(self.inner.remove(participant_id).await.is_some())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedback_scenario::ScenarioKey;

    fn set(tag: &str) -> FeedbackPatternSet {
        FeedbackPatternSet::new().with(ScenarioKey::RtSameAccSame, [tag, tag, tag])
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = MemoryPatternStore::default();
        let record = store.get(&ParticipantId::new("nobody")).await.unwrap();
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn put_then_get() {
        let store = MemoryPatternStore::new(100);
        let id = ParticipantId::new("p-1");
        let hash = ProfileHash::compute(b"profile");

        store.put(&id, set("a"), hash).await.unwrap();

        let record = store.get(&id).await.unwrap().unwrap();
        assert_eq!(record.participant_id, id);
        assert_eq!(record.pattern_set, set("a"));
        assert!(record.matches_profile(&hash));
        assert!(!record.is_complete());
    }

    #[tokio::test]
    async fn put_replaces_previous_record() {
        let store = MemoryPatternStore::new(100);
        let id = ParticipantId::new("p-1");

        store.put(&id, set("old"), ProfileHash::compute(b"1")).await.unwrap();
        store.put(&id, set("new"), ProfileHash::compute(b"2")).await.unwrap();

        let record = store.get(&id).await.unwrap().unwrap();
        assert_eq!(record.pattern_set, set("new"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn remove_record() {
        let store = MemoryPatternStore::new(100);
        let id = ParticipantId::new("p-1");
        store.put(&id, set("a"), ProfileHash::default()).await.unwrap();

        assert!(store.remove(&id).await.unwrap());
        assert!(!store.remove(&id).await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn concurrent_writers_leave_one_whole_record() {
        let store = MemoryPatternStore::new(100);
        let id = ParticipantId::new("p-1");

        let writers: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                let id = id.clone();
                tokio::spawn(async move {
                    let tag = format!("w{i}");
                    store
                        .put(&id, set(&tag), ProfileHash::compute(tag.as_bytes()))
                        .await
                        .unwrap();
                })
            })
            .collect();
        for w in writers {
            w.await.unwrap();
        }

        let record = store.get(&id).await.unwrap().unwrap();
        let tag = record.pattern_set.variant(ScenarioKey::RtSameAccSame, 0).unwrap();
        assert_eq!(record.source_profile_hash, ProfileHash::compute(tag.as_bytes()));
    }
}
