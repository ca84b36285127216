//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod catalog;
pub mod dialogue;

pub use catalog::{InvokeOperationCommand, InvokeOperationError, InvokeOperationHandler};
pub use dialogue::{RunDialogueCommand, RunDialogueHandler, RunDialogueResult};
