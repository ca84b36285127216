//! Knowledge-base error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors raised by schema validation, record generation and lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KnowledgeError {
    /// A field specification cannot be sampled. Fatal at load time.
    #[error("configuration error in field '{field}': {reason}")]
    Configuration { field: String, reason: String },

    /// A required query parameter is absent.
    #[error("missing required parameter '{parameter}'")]
    MissingParameter { parameter: String },
}

impl KnowledgeError {
    pub fn configuration(field: impl Into<String>, reason: impl Into<String>) -> Self {
        KnowledgeError::Configuration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn missing_parameter(parameter: impl Into<String>) -> Self {
        KnowledgeError::MissingParameter {
            parameter: parameter.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            KnowledgeError::Configuration { .. } => ErrorCode::ConfigurationError,
            KnowledgeError::MissingParameter { .. } => ErrorCode::MissingParameter,
        }
    }
}

impl From<KnowledgeError> for DomainError {
    fn from(err: KnowledgeError) -> Self {
        let base = DomainError::new(err.code(), err.to_string());
        match err {
            KnowledgeError::Configuration { field, .. } => base.with_detail("field", field),
            KnowledgeError::MissingParameter { parameter } => {
                base.with_detail("parameter", parameter)
            }
        }
    }
}
