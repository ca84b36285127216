//! State machine trait for stage enums.
//!
//! Provides a consistent interface for validating and performing state
//! transitions of lifecycle enums such as the dialogue [`Stage`].
//!
//! [`Stage`]: crate::domain::dialogue::Stage

use std::fmt;

use thiserror::Error;

/// Rejected state transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot transition from {from} to {to}")]
pub struct TransitionError {
    pub from: String,
    pub to: String,
}

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for Stage {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Setup, Dialogue) | (Dialogue, Evaluation) | ...)
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> { ... }
/// }
///
/// let next = stage.transition_to(Stage::Evaluation)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, TransitionError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(TransitionError {
                from: format!("{:?}", self),
                to: format!("{:?}", target),
            })
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestStatus {
        Draft,
        Active,
        Closed,
    }

    impl StateMachine for TestStatus {
        fn can_transition_to(&self, target: &Self) -> bool {
            use TestStatus::*;
            matches!((self, target), (Draft, Active) | (Active, Closed))
        }

        fn valid_transitions(&self) -> Vec<Self> {
            use TestStatus::*;
            match self {
                Draft => vec![Active],
                Active => vec![Closed],
                Closed => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_transition() {
        assert_eq!(
            TestStatus::Draft.transition_to(TestStatus::Active),
            Ok(TestStatus::Active)
        );
    }

    #[test]
    fn transition_to_fails_for_invalid_transition() {
        let err = TestStatus::Draft.transition_to(TestStatus::Closed).unwrap_err();
        assert_eq!(err.to_string(), "Cannot transition from Draft to Closed");
    }

    #[test]
    fn is_terminal_only_for_closed() {
        assert!(TestStatus::Closed.is_terminal());
        assert!(!TestStatus::Draft.is_terminal());
        assert!(!TestStatus::Active.is_terminal());
    }
}
