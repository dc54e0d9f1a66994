//! Directory-backed pattern store
//!
//! One JSON document per participant. The file name is the hex blake3 digest
//! of the participant id, so ids of any length or alphabet map to a short,
//! safe name. The record carries the id itself and is checked on read. Writes
//! land in a temporary sibling first and are renamed over the live file.

use crate::error::StoreError;
use crate::record::CachedPatternRecord;
use crate::store::PatternStore;
use async_trait::async_trait;
use feedback_scenario::{FeedbackPatternSet, ParticipantId, ProfileHash};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

const RECORD_EXTENSION: &str = "json";

/// Pattern store persisted as JSON files in a directory
#[derive(Debug)]
pub struct FilePatternStore {
    root: PathBuf,
    write_seq: AtomicU64,
}

impl FilePatternStore {
    /// Open store rooted at `root`, creating the directory if needed
    ///
    /// # Errors
    /// Returns `StoreError::Io` if the directory cannot be created
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| StoreError::io_error(&root, &e))?;

        tracing::info!(root = %root.display(), "opened pattern store directory");

        Ok(Self {
            root,
            write_seq: AtomicU64::new(0),
        })
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the live record for a participant
    #[must_use]
    pub fn record_path(&self, participant_id: &ParticipantId) -> PathBuf {
        self.root
            .join(format!("{}.{RECORD_EXTENSION}", file_stem(participant_id)))
    }

    fn temp_path(&self, participant_id: &ParticipantId) -> PathBuf {
        // Unique per write so concurrent writers never share a temp file
        let seq = self.write_seq.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!(
            ".{}.{}.{seq}.tmp",
            file_stem(participant_id),
            std::process::id()
        ))
    }
}

fn file_stem(participant_id: &ParticipantId) -> String {
    hex::encode(blake3::hash(participant_id.as_str().as_bytes()).as_bytes())
}

#[async_trait]
impl PatternStore for FilePatternStore {
    async fn get(
        &self,
        participant_id: &ParticipantId,
    ) -> Result<Option<CachedPatternRecord>, StoreError> {
        let path = self.record_path(participant_id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io_error(&path, &e)),
        };

        let record: CachedPatternRecord = serde_json::from_slice(&bytes)?;
        if &record.participant_id != participant_id {
            return Err(StoreError::Serialization(format!(
                "record at {} belongs to {}",
                path.display(),
                record.participant_id
            )));
        }
        Ok(Some(record))
    }

    async fn put(
        &self,
        participant_id: &ParticipantId,
        pattern_set: FeedbackPatternSet,
        profile_hash: ProfileHash,
    ) -> Result<(), StoreError> {
        let record = CachedPatternRecord::new(participant_id.clone(), pattern_set, profile_hash);
        let bytes = serde_json::to_vec_pretty(&record)?;

        let path = self.record_path(participant_id);
        let tmp = self.temp_path(participant_id);

        if let Err(e) = tokio::fs::write(&tmp, &bytes).await {
            return Err(StoreError::io_error(&tmp, &e));
        }
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::io_error(&path, &e));
        }

        tracing::debug!(
            participant = %participant_id,
            path = %path.display(),
            "stored pattern set on disk"
        );
        Ok(())
    }

    async fn remove(&self, participant_id: &ParticipantId) -> Result<bool, StoreError> {
        let path = self.record_path(participant_id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io_error(&path, &e)),
        }
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
