//! DialogueAgent port - Interface for a role taking part in a session.
//!
//! The messaging transport (crowd worker UI, chat bridge, scripted bot) is
//! an external collaborator. The dialogue world owns one agent per role and
//! talks to it only through this port, so roles never reference each other.
//!
//! ## Delivery model
//!
//! - `observe` delivers one outbound message to the role.
//! - `act` waits for the role's next message (dialogue stage).
//! - `poll` returns immediately with a pending message, if any
//!   (evaluation stage, where both roles are pending at once).
//! - `shutdown` releases the role once the session has ended.

use async_trait::async_trait;

use crate::domain::dialogue::Termination;
use crate::domain::protocol::WireMessage;

/// Errors raised by an agent transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    /// The role's channel is gone; treated as a disconnect.
    #[error("agent channel closed")]
    Closed,

    /// Any other transport failure.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Port for one dialogue participant.
#[async_trait]
pub trait DialogueAgent: Send {
    /// Identifier of the worker behind this role, recorded in the transcript.
    fn worker_id(&self) -> &str;

    /// Delivers a message to the role.
    async fn observe(&mut self, message: &WireMessage) -> Result<(), AgentError>;

    /// Waits for the role's next message.
    async fn act(&mut self) -> Result<WireMessage, AgentError>;

    /// Returns the role's next message without waiting.
    async fn poll(&mut self) -> Result<Option<WireMessage>, AgentError>;

    /// Releases the role. Must not fail; transports log their own errors.
    async fn shutdown(&mut self, termination: &Termination);
}
