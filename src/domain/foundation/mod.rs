//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, the state machine trait and the
//! error vocabulary used across the engine.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode};
pub use ids::{RecordId, SessionId};
pub use state_machine::{StateMachine, TransitionError};
pub use timestamp::Timestamp;
