//! Suggestion service configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Suggestion service configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SuggestionsConfig {
    /// NLU endpoint; suggestions are disabled when absent
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl SuggestionsConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if a suggestion service is configured
    pub fn is_enabled(&self) -> bool {
        self.endpoint.as_ref().is_some_and(|e| !e.is_empty())
    }

    /// Validate suggestion configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(endpoint) = self.endpoint.as_ref().filter(|e| !e.is_empty()) {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ValidationError::InvalidSuggestionEndpoint);
            }
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidDuration("suggestions.timeout_secs"));
        }
        Ok(())
    }
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestions_disabled_by_default() {
        let config = SuggestionsConfig::default();
        assert!(!config.is_enabled());
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_endpoint_scheme() {
        let config = SuggestionsConfig {
            endpoint: Some("nlu.internal:8000".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidSuggestionEndpoint)
        );

        let config = SuggestionsConfig {
            endpoint: Some("https://nlu.internal/suggest".to_string()),
            ..Default::default()
        };
        assert!(config.is_enabled());
        assert!(config.validate().is_ok());
    }
}
