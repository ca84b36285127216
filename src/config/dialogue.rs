//! Dialogue session configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::dialogue::DialogueSettings;

/// Dialogue configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DialogueConfig {
    /// Back-off between empty evaluation polls, in milliseconds
    #[serde(default = "default_poll_interval")]
    pub evaluation_poll_interval_ms: u64,

    /// Bound on parallel role teardown, in milliseconds
    #[serde(default = "default_teardown_timeout")]
    pub teardown_timeout_ms: u64,

    /// Safety cap; reaching it ends the dialogue as completed
    pub max_turns: Option<u32>,
}

impl DialogueConfig {
    /// Get the poll interval as Duration
    pub fn evaluation_poll_interval(&self) -> Duration {
        Duration::from_millis(self.evaluation_poll_interval_ms)
    }

    /// Get the teardown timeout as Duration
    pub fn teardown_timeout(&self) -> Duration {
        Duration::from_millis(self.teardown_timeout_ms)
    }

    /// Session settings for the dialogue world
    pub fn settings(&self) -> DialogueSettings {
        DialogueSettings {
            evaluation_poll_interval: self.evaluation_poll_interval(),
            teardown_timeout: self.teardown_timeout(),
            max_turns: self.max_turns,
        }
    }

    /// Validate dialogue configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.evaluation_poll_interval_ms == 0 {
            return Err(ValidationError::InvalidDuration(
                "dialogue.evaluation_poll_interval_ms",
            ));
        }
        if self.teardown_timeout_ms == 0 {
            return Err(ValidationError::InvalidDuration("dialogue.teardown_timeout_ms"));
        }
        if self.max_turns == Some(0) {
            return Err(ValidationError::InvalidMaxTurns);
        }
        Ok(())
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            evaluation_poll_interval_ms: default_poll_interval(),
            teardown_timeout_ms: default_teardown_timeout(),
            max_turns: None,
        }
    }
}

fn default_poll_interval() -> u64 {
    200
}

fn default_teardown_timeout() -> u64 {
    5000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialogue_config_defaults() {
        let config = DialogueConfig::default();
        assert_eq!(config.evaluation_poll_interval(), Duration::from_millis(200));
        assert_eq!(config.teardown_timeout(), Duration::from_secs(5));
        assert_eq!(config.settings(), DialogueSettings::default());
    }

    #[test]
    fn test_validation_zero_durations() {
        let config = DialogueConfig {
            evaluation_poll_interval_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = DialogueConfig {
            teardown_timeout_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_turn_cap() {
        let config = DialogueConfig {
            max_turns: Some(0),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidMaxTurns));
    }
}
