//! Dialogue session handlers.

mod run_dialogue;

pub use run_dialogue::{RunDialogueCommand, RunDialogueHandler, RunDialogueResult};
