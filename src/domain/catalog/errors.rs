//! Catalog error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::knowledge::KnowledgeError;

/// Errors raised while loading the catalog or dispatching an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No operation or domain is registered under this name.
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    /// The operation's own required parameter is absent.
    #[error("{operation}: missing required parameter '{parameter}'")]
    MissingParameter { operation: String, parameter: String },

    /// A parameter is present but unusable (wrong type, predicate where a
    /// literal is needed, impossible value).
    #[error("{operation}: invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        operation: String,
        parameter: String,
        reason: String,
    },

    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),
}

impl CatalogError {
    pub fn missing(operation: impl Into<String>, parameter: impl Into<String>) -> Self {
        CatalogError::MissingParameter {
            operation: operation.into(),
            parameter: parameter.into(),
        }
    }

    pub fn invalid(
        operation: impl Into<String>,
        parameter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CatalogError::InvalidParameter {
            operation: operation.into(),
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Schema-resource errors are reported as configuration errors.
    pub fn resource(reason: impl Into<String>) -> Self {
        CatalogError::Knowledge(KnowledgeError::configuration("<schemas>", reason))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CatalogError::UnknownOperation(_) => ErrorCode::UnknownOperation,
            CatalogError::MissingParameter { .. } => ErrorCode::MissingParameter,
            CatalogError::InvalidParameter { .. } => ErrorCode::InvalidParameter,
            CatalogError::Knowledge(inner) => inner.code(),
        }
    }

    /// The offending parameter when the call can be recovered into a
    /// failure response.
    pub fn recoverable_parameter(&self) -> Option<&str> {
        match self {
            CatalogError::MissingParameter { parameter, .. }
            | CatalogError::InvalidParameter { parameter, .. } => Some(parameter),
            CatalogError::Knowledge(KnowledgeError::MissingParameter { parameter }) => {
                Some(parameter)
            }
            _ => None,
        }
    }
}

impl From<CatalogError> for DomainError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Knowledge(inner) => inner.into(),
            CatalogError::UnknownOperation(ref name) => {
                DomainError::new(err.code(), err.to_string()).with_detail("operation", name)
            }
            CatalogError::MissingParameter {
                ref operation,
                ref parameter,
            }
            | CatalogError::InvalidParameter {
                ref operation,
                ref parameter,
                ..
            } => DomainError::new(err.code(), err.to_string())
                .with_detail("operation", operation)
                .with_detail("parameter", parameter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knowledge_missing_parameter_is_recoverable() {
        let err: CatalogError = KnowledgeError::missing_parameter("City").into();
        assert_eq!(err.recoverable_parameter(), Some("City"));
        assert_eq!(err.code(), ErrorCode::MissingParameter);
    }

    #[test]
    fn unknown_operation_is_not_recoverable() {
        let err = CatalogError::UnknownOperation("teleport".into());
        assert!(err.recoverable_parameter().is_none());
        let domain: DomainError = err.into();
        assert_eq!(domain.code, ErrorCode::UnknownOperation);
        assert_eq!(domain.details.get("operation"), Some(&"teleport".to_string()));
    }

    #[test]
    fn missing_parameter_message_names_operation() {
        let err = CatalogError::missing("restaurant_reserve", "Name");
        assert_eq!(
            err.to_string(),
            "restaurant_reserve: missing required parameter 'Name'"
        );
    }
}
