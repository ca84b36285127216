//! In-Memory Transcript Store Adapter
//!
//! Keeps transcripts in memory. Useful for testing and the demo command.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::dialogue::SessionTranscript;
use crate::domain::foundation::SessionId;
use crate::ports::{TranscriptStore, TranscriptStoreError};

/// In-memory storage for session transcripts
#[derive(Debug, Clone, Default)]
pub struct InMemoryTranscriptStore {
    transcripts: Arc<RwLock<HashMap<SessionId, SessionTranscript>>>,
}

impl InMemoryTranscriptStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored transcripts
    pub async fn len(&self) -> usize {
        self.transcripts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.transcripts.read().await.is_empty()
    }
}

#[async_trait]
impl TranscriptStore for InMemoryTranscriptStore {
    async fn save(&self, transcript: &SessionTranscript) -> Result<(), TranscriptStoreError> {
        let mut transcripts = self.transcripts.write().await;
        transcripts.insert(transcript.session_id, transcript.clone());
        Ok(())
    }

    async fn load(
        &self,
        session_id: SessionId,
    ) -> Result<Option<SessionTranscript>, TranscriptStoreError> {
        Ok(self.transcripts.read().await.get(&session_id).cloned())
    }

    async fn list(&self) -> Result<Vec<SessionId>, TranscriptStoreError> {
        Ok(self.transcripts.read().await.keys().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript() -> SessionTranscript {
        SessionTranscript {
            session_id: SessionId::new(),
            domains: vec!["hotel".into()],
            user_worker_id: "u".into(),
            wizard_worker_id: "w".into(),
            events: Vec::new(),
            completed: true,
            abort_reason: None,
        }
    }

    #[tokio::test]
    async fn save_then_load() {
        let store = InMemoryTranscriptStore::new();
        let transcript = transcript();
        store.save(&transcript).await.unwrap();
        assert_eq!(store.load(transcript.session_id).await.unwrap(), Some(transcript));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn unknown_session_is_none() {
        let store = InMemoryTranscriptStore::new();
        assert_eq!(store.load(SessionId::new()).await.unwrap(), None);
        assert!(store.list().await.unwrap().is_empty());
    }
}
