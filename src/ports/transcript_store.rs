//! TranscriptStore port - Persistence of finished sessions.
//!
//! The world hands over the transcript once, at session end, whether the
//! session completed or was aborted.

use async_trait::async_trait;

use crate::domain::dialogue::SessionTranscript;
use crate::domain::foundation::SessionId;

/// Errors that can occur while storing transcripts.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptStoreError {
    #[error("Failed to serialize transcript: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize transcript: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for saving and loading session transcripts.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Saves a transcript, replacing any earlier one for the same session.
    async fn save(&self, transcript: &SessionTranscript) -> Result<(), TranscriptStoreError>;

    /// Loads a transcript; `None` if the session was never saved.
    async fn load(&self, session_id: SessionId)
        -> Result<Option<SessionTranscript>, TranscriptStoreError>;

    /// Ids of every stored session.
    async fn list(&self) -> Result<Vec<SessionId>, TranscriptStoreError>;
}
