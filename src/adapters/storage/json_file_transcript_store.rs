//! File-based Transcript Store Adapter
//!
//! Stores one pretty-printed JSON file per session, named after the
//! session id. Files are written to a temporary name and renamed into
//! place so a crash never leaves a half-written transcript.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::dialogue::SessionTranscript;
use crate::domain::foundation::SessionId;
use crate::ports::{TranscriptStore, TranscriptStoreError};

/// File-based storage for session transcripts
#[derive(Debug, Clone)]
pub struct JsonFileTranscriptStore {
    base_path: PathBuf,
}

impl JsonFileTranscriptStore {
    /// Create a new file store with a base directory
    ///
    /// # Example
    /// ```ignore
    /// let store = JsonFileTranscriptStore::new("./data/transcripts");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn transcript_path(&self, session_id: SessionId) -> PathBuf {
        self.base_path.join(format!("{}.json", session_id))
    }

    async fn ensure_dir(&self) -> Result<(), TranscriptStoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| TranscriptStoreError::IoError(e.to_string()))
    }
}

#[async_trait]
impl TranscriptStore for JsonFileTranscriptStore {
    async fn save(&self, transcript: &SessionTranscript) -> Result<(), TranscriptStoreError> {
        self.ensure_dir().await?;

        let json = serde_json::to_string_pretty(transcript)
            .map_err(|e| TranscriptStoreError::SerializationFailed(e.to_string()))?;

        let path = self.transcript_path(transcript.session_id);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .await
            .map_err(|e| TranscriptStoreError::IoError(e.to_string()))?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| TranscriptStoreError::IoError(e.to_string()))?;

        tracing::debug!(session_id = %transcript.session_id, path = %path.display(), "transcript saved");
        Ok(())
    }

    async fn load(
        &self,
        session_id: SessionId,
    ) -> Result<Option<SessionTranscript>, TranscriptStoreError> {
        let path = self.transcript_path(session_id);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)
            .await
            .map_err(|e| TranscriptStoreError::IoError(e.to_string()))?;
        let transcript = serde_json::from_str(&json)
            .map_err(|e| TranscriptStoreError::DeserializationFailed(e.to_string()))?;
        Ok(Some(transcript))
    }

    async fn list(&self) -> Result<Vec<SessionId>, TranscriptStoreError> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&self.base_path)
            .await
            .map_err(|e| TranscriptStoreError::IoError(e.to_string()))?;
        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| TranscriptStoreError::IoError(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<SessionId>().ok())
            {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}
