//! Dialogue world - drives one session through its stages.
//!
//! The world owns every role handle. Roles never talk to each other
//! directly: each message is decoded into a [`Command`], applied to the
//! session and, where the command calls for it, re-encoded for the other
//! role. One call to [`DialogueWorld::parley`] performs one step of the
//! current stage.
//!
//! # Dialogue stage
//!
//! Even turns wait on the user, odd turns on the wizard. Utterances,
//! silences and picked suggestions advance the turn; queries, selections
//! and suggestion requests do not, so the wizard acts again.
//!
//! # Evaluation stage
//!
//! Both roles are polled without blocking; an empty sweep backs off for
//! the configured interval. Anything other than the evaluation answers
//! earns a reminder.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::Timestamp;
use crate::domain::protocol::{Command, CommandCodec, Role, WireMessage};
use crate::ports::{
    AgentError, DialogueAgent, Injection, SuggestionProvider, SuggestionRequest, TurnObserver,
    TurnSnapshot,
};

use super::errors::SessionError;
use super::oracle::KnowledgeBaseOracle;
use super::session::{DialogueSession, SessionTranscript, Termination};
use super::stage::Stage;

/// Timing knobs of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueSettings {
    pub evaluation_poll_interval: Duration,
    pub teardown_timeout: Duration,
    /// Reaching this many turns ends the dialogue as if completed.
    pub max_turns: Option<u32>,
}

impl Default for DialogueSettings {
    fn default() -> Self {
        Self {
            evaluation_poll_interval: Duration::from_millis(200),
            teardown_timeout: Duration::from_millis(5000),
            max_turns: None,
        }
    }
}

/// Task descriptions sent to each role during setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTasks {
    pub user: String,
    pub wizard: String,
}

/// The two worker roles of a session.
pub struct Participants {
    pub user: Box<dyn DialogueAgent>,
    pub wizard: Box<dyn DialogueAgent>,
}

/// Result of [`DialogueWorld::run`].
#[derive(Debug)]
pub struct SessionOutcome {
    pub transcript: SessionTranscript,
    pub termination: Termination,
    /// The error that ended the session early, including disconnects.
    pub error: Option<SessionError>,
}

/// Orchestrates one dialogue session.
pub struct DialogueWorld {
    session: DialogueSession,
    codec: CommandCodec,
    oracle: KnowledgeBaseOracle,
    user: Box<dyn DialogueAgent>,
    wizard: Box<dyn DialogueAgent>,
    tasks: RoleTasks,
    settings: DialogueSettings,
    observers: Vec<Box<dyn TurnObserver>>,
    suggestions: Option<Arc<dyn SuggestionProvider>>,
}

impl DialogueWorld {
    pub fn new(
        session: DialogueSession,
        codec: CommandCodec,
        oracle: KnowledgeBaseOracle,
        participants: Participants,
        tasks: RoleTasks,
    ) -> Self {
        Self {
            session,
            codec,
            oracle,
            user: participants.user,
            wizard: participants.wizard,
            tasks,
            settings: DialogueSettings::default(),
            observers: Vec::new(),
            suggestions: None,
        }
    }

    pub fn with_settings(mut self, settings: DialogueSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn TurnObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn with_suggestions(mut self, provider: Arc<dyn SuggestionProvider>) -> Self {
        self.suggestions = Some(provider);
        self
    }

    pub fn session(&self) -> &DialogueSession {
        &self.session
    }

    /// Performs one step of the current stage.
    ///
    /// # Errors
    ///
    /// Every error ends the session: protocol violations, disconnects,
    /// transport failures and undecodable evaluation or selection payloads.
    pub async fn parley(&mut self) -> Result<(), SessionError> {
        match self.session.stage() {
            Stage::Setup => self.setup().await,
            Stage::Dialogue => self.dialogue_turn().await,
            Stage::Evaluation => self.evaluation_sweep().await,
            Stage::End => Ok(()),
        }
    }

    /// Runs the session to its end, then shuts every role down.
    pub async fn run(mut self) -> SessionOutcome {
        let session_id = self.session.id();
        tracing::info!(%session_id, "dialogue session started");

        let mut result = Ok(());
        while self.session.stage() != Stage::End {
            if let Err(err) = self.parley().await {
                result = Err(err);
                break;
            }
        }

        let termination = match &result {
            Ok(()) => Termination::Completed,
            Err(err) => {
                if err.is_disconnect() {
                    tracing::info!(%session_id, reason = %err, "dialogue session aborted");
                } else {
                    tracing::error!(%session_id, error = %err, code = %err.code(), "dialogue session failed");
                }
                self.session.abort(err.to_string(), err.code().to_string());
                Termination::Aborted(err.to_string())
            }
        };

        self.teardown(&termination).await;
        tracing::info!(
            %session_id,
            turns = self.session.turn(),
            events = self.session.events().len(),
            completed = termination.is_completed(),
            "dialogue session ended"
        );

        SessionOutcome {
            transcript: self.transcript(),
            termination,
            error: result.err(),
        }
    }

    pub fn transcript(&self) -> SessionTranscript {
        self.session
            .transcript(self.user.worker_id(), self.wizard.worker_id())
    }

    async fn setup(&mut self) -> Result<(), SessionError> {
        let assignments = [
            (Role::User, self.tasks.user.clone()),
            (Role::Wizard, self.tasks.wizard.clone()),
        ];
        for (recipient, task) in assignments {
            self.send(recipient, Command::Setup { recipient, task }).await?;
        }
        self.session.transition_to(Stage::Dialogue)?;
        Ok(())
    }

    async fn dialogue_turn(&mut self) -> Result<(), SessionError> {
        if let Some(max_turns) = self.settings.max_turns {
            if self.session.turn() >= max_turns {
                tracing::info!(turn = self.session.turn(), max_turns, "turn limit reached");
                return self.complete_dialogue().await;
            }
        }

        for injection in self.consult_observers() {
            self.send(injection.to, Command::Guide { text: injection.text })
                .await?;
        }

        let role = self.session.active_role();
        let message = self
            .agent_mut(role)
            .act()
            .await
            .map_err(|err| agent_failure(role, err))?;
        let command = self.decode(role, &message)?;
        self.apply_dialogue_command(role, command).await
    }

    async fn apply_dialogue_command(
        &mut self,
        role: Role,
        command: Command,
    ) -> Result<(), SessionError> {
        let wizard_only = |command: &Command| {
            if role == Role::Wizard {
                Ok(())
            } else {
                Err(SessionError::violation(Stage::Dialogue, role, command.kind()))
            }
        };

        match command {
            Command::Utter { .. } => {
                self.log(&command);
                self.forward(role, &command).await?;
                self.session.advance_turn();
            }
            Command::Silent { .. } => {
                self.log(&command);
                self.session.advance_turn();
            }
            Command::Query(ref query) => {
                wizard_only(&command)?;
                self.log(&command);
                let reply = self.oracle.answer(query);
                self.session.select_primary(reply.selection());
                self.session.record(reply.to_event(Timestamp::now()));
                let message = reply.to_message(self.codec.constants());
                self.deliver(Role::Wizard, &message).await?;
            }
            Command::SelectPrimary { ref item, .. } => {
                wizard_only(&command)?;
                self.session.select_primary(Some(item.clone()));
                self.log(&command);
            }
            Command::SelectSecondary { ref item, .. } => {
                wizard_only(&command)?;
                self.session.select_secondary(item.clone());
                self.log(&command);
            }
            Command::RequestSuggestions { ref draft, .. } => {
                wizard_only(&command)?;
                self.log(&command);
                let request = self.suggestion_request(draft);
                let suggestions = request_suggestions(self.suggestions.clone(), request).await;
                self.send(role, Command::SupplySuggestions { suggestions })
                    .await?;
            }
            Command::PickSuggestion { sender, ref text } => {
                wizard_only(&command)?;
                self.log(&command);
                let utterance = Command::Utter {
                    sender,
                    text: text.clone(),
                };
                self.forward(role, &utterance).await?;
                self.session.advance_turn();
            }
            Command::DialogueCompleted { .. } => {
                self.log(&command);
                self.complete_dialogue().await?;
            }
            Command::TaskDone { .. }
            | Command::Setup { .. }
            | Command::Guide { .. }
            | Command::Review { .. }
            | Command::SupplySuggestions { .. } => {
                let err = SessionError::violation(Stage::Dialogue, role, command.kind());
                self.log(&command);
                return Err(err);
            }
        }
        Ok(())
    }

    async fn complete_dialogue(&mut self) -> Result<(), SessionError> {
        self.session.transition_to(Stage::Evaluation)?;
        let constants = self.codec.constants();
        let review = Command::Review {
            questions: constants.evaluation_questions.clone(),
        };
        let guide = Command::Guide {
            text: constants.evaluation_guide.clone(),
        };
        for role in [Role::User, Role::Wizard] {
            self.send(role, review.clone()).await?;
            self.send(role, guide.clone()).await?;
        }
        Ok(())
    }

    /// Polls every role still owing its evaluation once; sleeps when none
    /// of them had anything to say.
    async fn evaluation_sweep(&mut self) -> Result<(), SessionError> {
        let mut progressed = false;
        for role in self.session.pending_evaluations() {
            let polled = self
                .agent_mut(role)
                .poll()
                .await
                .map_err(|err| agent_failure(role, err))?;
            let Some(message) = polled else {
                continue;
            };
            progressed = true;
            match self.decode(role, &message)? {
                Command::TaskDone { answers, sender } => {
                    self.log(&Command::TaskDone {
                        sender,
                        answers: answers.clone(),
                    });
                    tracing::debug!(%role, answers = answers.len(), "evaluation received");
                    self.session.record_evaluation(role, answers);
                }
                other => {
                    self.log(&other);
                    let text = self.codec.constants().evaluation_reminder.clone();
                    self.send(role, Command::Guide { text }).await?;
                }
            }
        }

        if self.session.pending_evaluations().is_empty() {
            self.session.transition_to(Stage::End)?;
        } else if !progressed {
            tokio::time::sleep(self.settings.evaluation_poll_interval).await;
        }
        Ok(())
    }

    /// Shuts both roles down in parallel, bounded by the teardown timeout.
    async fn teardown(&mut self, termination: &Termination) {
        let timeout = self.settings.teardown_timeout;
        let user = &mut self.user;
        let wizard = &mut self.wizard;
        let shutdown = async {
            tokio::join!(user.shutdown(termination), wizard.shutdown(termination));
        };
        match tokio::time::timeout(timeout, shutdown).await {
            Ok(()) => tracing::info!(session_id = %self.session.id(), "roles released"),
            Err(_) => tracing::warn!(
                session_id = %self.session.id(),
                timeout_ms = timeout.as_millis() as u64,
                "role teardown timed out"
            ),
        }
    }

    fn consult_observers(&mut self) -> Vec<Injection> {
        let snapshot = TurnSnapshot {
            stage: self.session.stage(),
            turn: self.session.turn(),
            active: self.session.active_role(),
            events: self.session.events(),
        };
        self.observers
            .iter_mut()
            .flat_map(|observer| observer.inspect(&snapshot))
            .collect()
    }

    fn suggestion_request(&self, draft: &str) -> SuggestionRequest {
        SuggestionRequest {
            draft: draft.to_string(),
            history: self.history(),
            primary_item: self.session.selection().primary.clone(),
        }
    }

    /// Utterance texts so far, oldest first.
    fn history(&self) -> Vec<String> {
        self.session
            .events()
            .iter()
            .filter(|event| event.action == "Utter" || event.action == "PickSuggestion")
            .filter_map(|event| event.field("Text").and_then(|text| text.as_str()))
            .map(str::to_string)
            .collect()
    }

    fn decode(&self, role: Role, message: &WireMessage) -> Result<Command, SessionError> {
        if self.codec.constants().is_disconnect(&message.text) {
            return Err(SessionError::RoleDisconnected(role));
        }
        Ok(self.codec.decode(&message.text, role)?)
    }

    fn log(&mut self, command: &Command) {
        if let Some(event) = command.to_event(Timestamp::now()) {
            self.session.record(event);
        }
    }

    async fn forward(&mut self, from: Role, command: &Command) -> Result<(), SessionError> {
        let Some(to) = from.partner() else {
            return Ok(());
        };
        let message = self.codec.encode(command);
        self.deliver(to, &message).await
    }

    async fn send(&mut self, to: Role, command: Command) -> Result<(), SessionError> {
        let message = self.codec.encode(&command);
        self.deliver(to, &message).await
    }

    async fn deliver(&mut self, to: Role, message: &WireMessage) -> Result<(), SessionError> {
        match to {
            Role::User | Role::Wizard => self
                .agent_mut(to)
                .observe(message)
                .await
                .map_err(|err| agent_failure(to, err)),
            Role::KnowledgeBase | Role::System => {
                tracing::warn!(%to, "dropping message addressed to a non-worker role");
                Ok(())
            }
        }
    }

    /// The worker behind `role`; only the user and the wizard are agents.
    fn agent_mut(&mut self, role: Role) -> &mut dyn DialogueAgent {
        match role {
            Role::User => self.user.as_mut(),
            Role::Wizard | Role::KnowledgeBase | Role::System => self.wizard.as_mut(),
        }
    }
}

/// Without a provider the wizard gets an empty list; provider failures are
/// logged and treated the same way.
async fn request_suggestions(
    provider: Option<Arc<dyn SuggestionProvider>>,
    request: SuggestionRequest,
) -> Vec<String> {
    let Some(provider) = provider else {
        return Vec::new();
    };
    match provider.suggest(&request).await {
        Ok(suggestions) => suggestions,
        Err(err) => {
            tracing::warn!(error = %err, "suggestion provider failed");
            Vec::new()
        }
    }
}

fn agent_failure(role: Role, err: AgentError) -> SessionError {
    match err {
        AgentError::Closed => SessionError::RoleDisconnected(role),
        AgentError::Transport(message) => SessionError::agent(role, message),
    }
}
