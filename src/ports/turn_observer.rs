//! TurnObserver port - Agents consulted on every dialogue turn.
//!
//! Observers never act as a role. They look at the session after each turn
//! and may inject system guidance to either the user or the wizard, for
//! example a reminder that the dialogue can be wrapped up.

use crate::domain::dialogue::Stage;
use crate::domain::protocol::{EventRecord, Role};

/// Read-only view of a session handed to observers.
#[derive(Debug, Clone, Copy)]
pub struct TurnSnapshot<'a> {
    pub stage: Stage,
    pub turn: u32,
    /// The role whose turn is next.
    pub active: Role,
    pub events: &'a [EventRecord],
}

/// A system message to deliver to one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injection {
    pub to: Role,
    pub text: String,
}

impl Injection {
    pub fn new(to: Role, text: impl Into<String>) -> Self {
        Self {
            to,
            text: text.into(),
        }
    }
}

/// Port for per-turn observers.
pub trait TurnObserver: Send {
    /// Inspects the session; returns the messages to inject, possibly none.
    fn inspect(&mut self, snapshot: &TurnSnapshot<'_>) -> Vec<Injection>;
}
