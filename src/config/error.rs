//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Failed to read {path}: {reason}")]
    ResourceUnreadable { path: String, reason: String },
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("records_per_domain must be between 1 and {max}")]
    InvalidRecordCount { max: usize },

    #[error("Invalid {0} (must be greater than zero)")]
    InvalidDuration(&'static str),

    #[error("max_turns must be greater than zero")]
    InvalidMaxTurns,

    #[error("Invalid log level directive: {0}")]
    InvalidLogLevel(String),

    #[error("Suggestion endpoint must be an http(s) URL")]
    InvalidSuggestionEndpoint,

    #[error("Empty path for {0}")]
    EmptyPath(&'static str),
}
