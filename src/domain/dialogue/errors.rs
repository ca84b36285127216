//! Session error types.

use crate::domain::foundation::{DomainError, ErrorCode, TransitionError};
use crate::domain::protocol::{CodecError, CommandKind, Role};

use super::stage::Stage;

/// Errors that end a dialogue session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A command arrived that the current stage (or sender) does not allow.
    ProtocolViolation {
        stage: Stage,
        sender: Role,
        command: CommandKind,
    },
    /// A role left the session. A normal termination signal.
    RoleDisconnected(Role),
    /// The role's transport failed.
    Agent { role: Role, message: String },
    /// A worker message could not be decoded.
    Codec(CodecError),
    /// The transcript could not be stored.
    Storage(String),
    /// A stage transition was attempted out of order.
    InvalidState(String),
    /// The session cannot be set up (unknown domain, bad constants).
    Configuration(String),
}

impl SessionError {
    pub fn violation(stage: Stage, sender: Role, command: CommandKind) -> Self {
        SessionError::ProtocolViolation {
            stage,
            sender,
            command,
        }
    }
    pub fn agent(role: Role, message: impl Into<String>) -> Self {
        SessionError::Agent {
            role,
            message: message.into(),
        }
    }
    pub fn storage(message: impl Into<String>) -> Self {
        SessionError::Storage(message.into())
    }
    pub fn configuration(message: impl Into<String>) -> Self {
        SessionError::Configuration(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::ProtocolViolation { .. } => ErrorCode::ProtocolViolation,
            SessionError::RoleDisconnected(_) => ErrorCode::RoleDisconnected,
            SessionError::Agent { .. } => ErrorCode::AgentError,
            SessionError::Codec(inner) => inner.code(),
            SessionError::Storage(_) => ErrorCode::StorageError,
            SessionError::InvalidState(_) => ErrorCode::InternalError,
            SessionError::Configuration(_) => ErrorCode::ConfigurationError,
        }
    }
    /// True for errors that end the session without anything going wrong.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, SessionError::RoleDisconnected(_))
    }
    pub fn message(&self) -> String {
        match self {
            SessionError::ProtocolViolation {
                stage,
                sender,
                command,
            } => format!(
                "Protocol violation: {} sent {} during {:?}",
                sender, command, stage
            ),
            SessionError::RoleDisconnected(role) => format!("{} disconnected", role),
            SessionError::Agent { role, message } => format!("{} agent failed: {}", role, message),
            SessionError::Codec(inner) => inner.to_string(),
            SessionError::Storage(msg) => format!("Storage error: {}", msg),
            SessionError::InvalidState(msg) => format!("Invalid state: {}", msg),
            SessionError::Configuration(msg) => format!("Configuration error: {}", msg),
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SessionError {}

impl From<CodecError> for SessionError {
    fn from(err: CodecError) -> Self {
        SessionError::Codec(err)
    }
}

impl From<TransitionError> for SessionError {
    fn from(err: TransitionError) -> Self {
        SessionError::InvalidState(err.to_string())
    }
}

impl From<SessionError> for DomainError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Codec(inner) => inner.into(),
            SessionError::ProtocolViolation {
                stage,
                sender,
                command,
            } => DomainError::new(err.code(), err.message())
                .with_detail("stage", format!("{:?}", stage))
                .with_detail("sender", sender.to_string())
                .with_detail("command", command.to_string()),
            SessionError::RoleDisconnected(role) | SessionError::Agent { role, .. } => {
                DomainError::new(err.code(), err.message()).with_detail("role", role.to_string())
            }
            _ => DomainError::new(err.code(), err.message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_names_sender_command_and_stage() {
        let err = SessionError::violation(Stage::Dialogue, Role::User, CommandKind::TaskDone);
        assert_eq!(err.code(), ErrorCode::ProtocolViolation);
        assert_eq!(
            err.to_string(),
            "Protocol violation: User sent TaskDone during Dialogue"
        );
    }

    #[test]
    fn disconnect_is_not_a_failure() {
        assert!(SessionError::RoleDisconnected(Role::Wizard).is_disconnect());
        assert!(!SessionError::storage("disk full").is_disconnect());
    }

    #[test]
    fn codec_errors_keep_their_code() {
        let err: SessionError = CodecError::malformed("TaskDone", "not json").into();
        assert_eq!(err.code(), ErrorCode::MalformedCommand);
    }

    #[test]
    fn converts_to_domain_error_with_role() {
        let domain: DomainError = SessionError::agent(Role::User, "socket reset").into();
        assert_eq!(domain.code, ErrorCode::AgentError);
        assert_eq!(domain.details.get("role").map(String::as_str), Some("User"));
    }
}
