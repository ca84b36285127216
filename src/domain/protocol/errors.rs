//! Protocol error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors raised while loading protocol constants or decoding messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A recognised command whose payload cannot be decoded.
    #[error("malformed {command} payload: {reason}")]
    MalformedPayload {
        command: &'static str,
        reason: String,
    },

    /// A wire message from an id that maps to no role.
    #[error("unknown sender id '{0}'")]
    UnknownSender(String),

    /// The constants resource is unreadable or inconsistent.
    #[error("invalid protocol constants: {0}")]
    Constants(String),
}

impl CodecError {
    pub fn malformed(command: &'static str, reason: impl Into<String>) -> Self {
        CodecError::MalformedPayload {
            command,
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CodecError::MalformedPayload { .. } | CodecError::UnknownSender(_) => {
                ErrorCode::MalformedCommand
            }
            CodecError::Constants(_) => ErrorCode::ConfigurationError,
        }
    }
}

impl From<CodecError> for DomainError {
    fn from(err: CodecError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
