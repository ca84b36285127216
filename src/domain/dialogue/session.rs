//! Dialogue session state.
//!
//! The session is the single writer of the event log. It tracks the stage,
//! the turn counter, the wizard's current selection and the evaluations
//! received so far. Wizard and knowledge-base events are stamped with the
//! selection as it stands when they are recorded.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::domain::foundation::{SessionId, StateMachine, Timestamp, TransitionError};
use crate::domain::protocol::{EventRecord, Role};

use super::stage::Stage;

/// The knowledge-base items the wizard currently has highlighted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub primary: Option<Json>,
    pub secondary: Option<Json>,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    Completed,
    Aborted(String),
}

impl Termination {
    pub fn is_completed(&self) -> bool {
        matches!(self, Termination::Completed)
    }
}

/// What is persisted once a session ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTranscript {
    pub session_id: SessionId,
    pub domains: Vec<String>,
    pub user_worker_id: String,
    pub wizard_worker_id: String,
    pub events: Vec<EventRecord>,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort_reason: Option<String>,
}

/// Mutable state of one dialogue session.
#[derive(Debug, Clone)]
pub struct DialogueSession {
    id: SessionId,
    domains: Vec<String>,
    stage: Stage,
    turn: u32,
    selection: Selection,
    events: Vec<EventRecord>,
    evaluations: HashMap<Role, Vec<(u32, bool)>>,
    abort_reason: Option<String>,
}

impl DialogueSession {
    pub fn new(id: SessionId, domains: Vec<String>) -> Self {
        Self {
            id,
            domains,
            stage: Stage::default(),
            turn: 0,
            selection: Selection::default(),
            events: Vec::new(),
            evaluations: HashMap::new(),
            abort_reason: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Even turns belong to the user, odd turns to the wizard.
    pub fn active_role(&self) -> Role {
        if self.turn % 2 == 0 {
            Role::User
        } else {
            Role::Wizard
        }
    }

    pub fn advance_turn(&mut self) {
        self.turn += 1;
    }

    pub fn transition_to(&mut self, target: Stage) -> Result<(), TransitionError> {
        self.stage = self.stage.transition_to(target)?;
        Ok(())
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// A new primary item invalidates the secondary one.
    pub fn select_primary(&mut self, item: Option<Json>) {
        self.selection.primary = item;
        self.selection.secondary = None;
    }

    pub fn select_secondary(&mut self, item: Json) {
        self.selection.secondary = Some(item);
    }

    /// Appends an event. Wizard and knowledge-base events carry the
    /// current selection.
    pub fn record(&mut self, event: EventRecord) {
        let event = match event.agent {
            Role::Wizard | Role::KnowledgeBase => event.with_selection(
                self.selection.primary.clone(),
                self.selection.secondary.clone(),
            ),
            Role::User | Role::System => event,
        };
        self.events.push(event);
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn record_evaluation(&mut self, role: Role, answers: Vec<(u32, bool)>) {
        self.evaluations.insert(role, answers);
    }

    pub fn evaluation(&self, role: Role) -> Option<&[(u32, bool)]> {
        self.evaluations.get(&role).map(Vec::as_slice)
    }

    /// Roles whose evaluation is still outstanding, user first.
    pub fn pending_evaluations(&self) -> Vec<Role> {
        [Role::User, Role::Wizard]
            .into_iter()
            .filter(|role| !self.evaluations.contains_key(role))
            .collect()
    }

    /// Marks the session aborted and logs an `Abort` event.
    pub fn abort(&mut self, reason: impl Into<String>, code: impl Into<String>) {
        let reason = reason.into();
        self.record(
            EventRecord::new(Role::System, "Abort", Timestamp::now())
                .with("Reason", reason.as_str())
                .with("Code", code.into()),
        );
        self.abort_reason = Some(reason);
    }

    pub fn abort_reason(&self) -> Option<&str> {
        self.abort_reason.as_deref()
    }

    pub fn is_completed(&self) -> bool {
        self.stage == Stage::End && self.abort_reason.is_none()
    }

    pub fn transcript(
        &self,
        user_worker_id: impl Into<String>,
        wizard_worker_id: impl Into<String>,
    ) -> SessionTranscript {
        SessionTranscript {
            session_id: self.id,
            domains: self.domains.clone(),
            user_worker_id: user_worker_id.into(),
            wizard_worker_id: wizard_worker_id.into(),
            events: self.events.clone(),
            completed: self.is_completed(),
            abort_reason: self.abort_reason.clone(),
        }
    }
}
