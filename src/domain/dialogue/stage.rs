//! Dialogue stage machine.
//!
//! A session moves Setup → Dialogue → Evaluation → End. Only the last
//! transition waits on both roles; an abort ends the session from any
//! stage without passing through the machine.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// The lifecycle stage of a dialogue session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Roles have not received their tasks yet.
    #[default]
    Setup,

    /// Turn-based exchange between user and wizard.
    Dialogue,

    /// Both roles answer the review questions.
    Evaluation,

    /// Both evaluations recorded.
    End,
}

impl Stage {
    /// Returns true while worker messages are being consumed.
    pub fn accepts_commands(&self) -> bool {
        matches!(self, Self::Dialogue | Self::Evaluation)
    }
}

impl StateMachine for Stage {
    fn can_transition_to(&self, target: &Self) -> bool {
        use Stage::*;
        matches!(
            (self, target),
            (Setup, Dialogue) | (Dialogue, Evaluation) | (Evaluation, End)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use Stage::*;
        match self {
            Setup => vec![Dialogue],
            Dialogue => vec![Evaluation],
            Evaluation => vec![End],
            End => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stage_is_setup() {
        assert_eq!(Stage::default(), Stage::Setup);
    }

    #[test]
    fn serializes_to_snake_case() {
        assert_eq!(serde_json::to_string(&Stage::Evaluation).unwrap(), "\"evaluation\"");
    }

    #[test]
    fn stages_advance_in_order() {
        let stage = Stage::Setup
            .transition_to(Stage::Dialogue)
            .and_then(|s| s.transition_to(Stage::Evaluation))
            .and_then(|s| s.transition_to(Stage::End))
            .unwrap();
        assert!(stage.is_terminal());
    }

    #[test]
    fn cannot_skip_evaluation() {
        let err = Stage::Dialogue.transition_to(Stage::End).unwrap_err();
        assert_eq!(err.to_string(), "Cannot transition from Dialogue to End");
    }

    #[test]
    fn only_dialogue_and_evaluation_accept_commands() {
        assert!(!Stage::Setup.accepts_commands());
        assert!(Stage::Dialogue.accepts_commands());
        assert!(Stage::Evaluation.accepts_commands());
        assert!(!Stage::End.accepts_commands());
    }
}
