//! Dialogue module - the wizard-of-oz session runtime.
//!
//! A [`DialogueWorld`] owns the user and wizard agents, the knowledge-base
//! oracle and the [`DialogueSession`] state, and steps the session through
//! its [`Stage`]s one parley at a time.

mod errors;
mod oracle;
mod session;
mod stage;
mod world;

pub use errors::SessionError;
pub use oracle::{KnowledgeBaseOracle, OracleReply};
pub use session::{DialogueSession, Selection, SessionTranscript, Termination};
pub use stage::Stage;
pub use world::{DialogueSettings, DialogueWorld, Participants, RoleTasks, SessionOutcome};
