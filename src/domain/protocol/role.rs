//! Dialogue participant roles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A participant in a dialogue session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Simulates the end customer.
    User,
    /// Simulates the assistant; the only role allowed to query.
    Wizard,
    /// Answers the wizard's queries from the catalog.
    KnowledgeBase,
    /// The server itself (setup, guides, reviews).
    System,
}

impl Role {
    /// The role whose messages an utterance is forwarded to.
    pub fn partner(self) -> Option<Role> {
        match self {
            Role::User => Some(Role::Wizard),
            Role::Wizard => Some(Role::User),
            Role::KnowledgeBase | Role::System => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::User => "User",
            Role::Wizard => "Wizard",
            Role::KnowledgeBase => "KnowledgeBase",
            Role::System => "System",
        };
        write!(f, "{}", s)
    }
}
