//! Error codes shared by every layer of the engine.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Schema and setup errors
    ConfigurationError,

    // Query errors
    MissingParameter,
    InvalidParameter,
    UnknownOperation,
    MalformedExpression,

    // Protocol errors
    MalformedCommand,
    ProtocolViolation,
    RoleDisconnected,

    // Infrastructure errors
    AgentError,
    StorageError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ConfigurationError => "CONFIGURATION_ERROR",
            ErrorCode::MissingParameter => "MISSING_PARAMETER",
            ErrorCode::InvalidParameter => "INVALID_PARAMETER",
            ErrorCode::UnknownOperation => "UNKNOWN_OPERATION",
            ErrorCode::MalformedExpression => "MALFORMED_EXPRESSION",
            ErrorCode::MalformedCommand => "MALFORMED_COMMAND",
            ErrorCode::ProtocolViolation => "PROTOCOL_VIOLATION",
            ErrorCode::RoleDisconnected => "ROLE_DISCONNECTED",
            ErrorCode::AgentError => "AGENT_ERROR",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
///
/// Layer-specific errors convert into this shape when they cross the
/// application boundary, so callers only need to match on [`ErrorCode`].
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}
