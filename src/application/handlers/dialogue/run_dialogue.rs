//! RunDialogueHandler - Command handler that runs one dialogue session to
//! its end and stores the transcript.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::catalog::DomainCatalog;
use crate::domain::dialogue::{
    DialogueSession, DialogueSettings, DialogueWorld, KnowledgeBaseOracle, Participants,
    RoleTasks, SessionError, SessionTranscript, Termination,
};
use crate::domain::foundation::SessionId;
use crate::domain::protocol::{CommandCodec, ProtocolConstants};
use crate::ports::{SuggestionProvider, TranscriptStore, TurnObserver};

/// Command to run a dialogue session.
pub struct RunDialogueCommand {
    /// Domains the session is about; each must have a knowledge base.
    pub domains: Vec<String>,
    pub tasks: RoleTasks,
    pub participants: Participants,
    /// Per-session observers.
    pub observers: Vec<Box<dyn TurnObserver>>,
    /// Seed for the oracle's random source; entropy when absent.
    pub seed: Option<u64>,
}

/// Result of a finished session.
#[derive(Debug)]
pub struct RunDialogueResult {
    pub session_id: SessionId,
    pub termination: Termination,
    pub transcript: SessionTranscript,
    /// The error that ended the session early, including disconnects.
    pub error: Option<SessionError>,
}

/// Handler for running dialogue sessions.
pub struct RunDialogueHandler {
    catalog: Arc<DomainCatalog>,
    constants: Arc<ProtocolConstants>,
    store: Arc<dyn TranscriptStore>,
    settings: DialogueSettings,
    suggestions: Option<Arc<dyn SuggestionProvider>>,
}

impl RunDialogueHandler {
    pub fn new(
        catalog: Arc<DomainCatalog>,
        constants: Arc<ProtocolConstants>,
        store: Arc<dyn TranscriptStore>,
    ) -> Self {
        Self {
            catalog,
            constants,
            store,
            settings: DialogueSettings::default(),
            suggestions: None,
        }
    }

    pub fn with_settings(mut self, settings: DialogueSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_suggestions(mut self, provider: Arc<dyn SuggestionProvider>) -> Self {
        self.suggestions = Some(provider);
        self
    }

    /// Runs the session and stores its transcript, completed or not.
    ///
    /// # Errors
    ///
    /// `Configuration` for a domain without a knowledge base, `Storage` if
    /// the transcript cannot be saved. Session-ending errors are reported
    /// on the result, not here.
    pub async fn handle(&self, cmd: RunDialogueCommand) -> Result<RunDialogueResult, SessionError> {
        // 1. Check every domain is served by the catalog
        if let Some(unknown) = cmd
            .domains
            .iter()
            .find(|domain| self.catalog.knowledge_base(domain).is_none())
        {
            return Err(SessionError::configuration(format!(
                "no knowledge base for domain '{}'",
                unknown
            )));
        }

        // 2. Assemble the world
        let session_id = SessionId::new();
        let rng = match cmd.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut world = DialogueWorld::new(
            DialogueSession::new(session_id, cmd.domains),
            CommandCodec::new(Arc::clone(&self.constants)),
            KnowledgeBaseOracle::new(Arc::clone(&self.catalog), rng),
            cmd.participants,
            cmd.tasks,
        )
        .with_settings(self.settings.clone());
        for observer in cmd.observers {
            world = world.with_observer(observer);
        }
        if let Some(provider) = &self.suggestions {
            world = world.with_suggestions(Arc::clone(provider));
        }

        // 3. Run to the end
        let outcome = world.run().await;

        // 4. Persist the transcript
        self.store
            .save(&outcome.transcript)
            .await
            .map_err(|e| SessionError::storage(e.to_string()))?;

        Ok(RunDialogueResult {
            session_id,
            termination: outcome.termination,
            transcript: outcome.transcript,
            error: outcome.error,
        })
    }
}
