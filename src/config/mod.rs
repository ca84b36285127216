//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `WOZSIM` prefix and
//! nested values use double underscores as separators. Every section has
//! defaults, so an empty environment is a valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use wozsim::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("{} records per domain", config.knowledge.records_per_domain);
//! ```

mod dialogue;
mod error;
mod knowledge;
mod logging;
mod protocol;
mod storage;
mod suggestions;

pub use dialogue::DialogueConfig;
pub use error::{ConfigError, ValidationError};
pub use knowledge::{KnowledgeConfig, MAX_RECORDS_PER_DOMAIN};
pub use logging::LoggingConfig;
pub use protocol::ProtocolConfig;
pub use storage::StorageConfig;
pub use suggestions::SuggestionsConfig;

use serde::Deserialize;
use std::path::Path;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Knowledge base generation (record count, seed, schema override)
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Protocol constants override
    #[serde(default)]
    pub protocol: ProtocolConfig,

    /// Session timing and turn cap
    #[serde(default)]
    pub dialogue: DialogueConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Transcript persistence
    #[serde(default)]
    pub storage: StorageConfig,

    /// Optional suggestion service
    #[serde(default)]
    pub suggestions: SuggestionsConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `WOZSIM` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `WOZSIM__KNOWLEDGE__RECORDS_PER_DOMAIN=500` -> `knowledge.records_per_domain = 500`
    /// - `WOZSIM__DIALOGUE__MAX_TURNS=40` -> `dialogue.max_turns = Some(40)`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("WOZSIM")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.knowledge.validate()?;
        self.protocol.validate()?;
        self.dialogue.validate()?;
        self.logging.validate()?;
        self.storage.validate()?;
        self.suggestions.validate()?;
        Ok(())
    }
}

/// Reads an optional override file; `None` means "use the embedded resource".
pub fn read_override(path: Option<&Path>) -> Result<Option<String>, ConfigError> {
    let Some(path) = path else {
        return Ok(None);
    };
    std::fs::read_to_string(path)
        .map(Some)
        .map_err(|e| ConfigError::ResourceUnreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("WOZSIM__KNOWLEDGE__RECORDS_PER_DOMAIN");
        env::remove_var("WOZSIM__KNOWLEDGE__SEED");
        env::remove_var("WOZSIM__DIALOGUE__MAX_TURNS");
        env::remove_var("WOZSIM__DIALOGUE__EVALUATION_POLL_INTERVAL_MS");
        env::remove_var("WOZSIM__SUGGESTIONS__ENDPOINT");
    }

    #[test]
    fn test_load_with_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.knowledge.records_per_domain, 1000);
        assert_eq!(config.dialogue.evaluation_poll_interval_ms, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("WOZSIM__KNOWLEDGE__RECORDS_PER_DOMAIN", "250");
        env::set_var("WOZSIM__KNOWLEDGE__SEED", "42");
        env::set_var("WOZSIM__DIALOGUE__MAX_TURNS", "30");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.knowledge.records_per_domain, 250);
        assert_eq!(config.knowledge.seed, Some(42));
        assert_eq!(config.dialogue.max_turns, Some(30));
    }

    #[test]
    fn test_validate_rejects_bad_section() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("WOZSIM__SUGGESTIONS__ENDPOINT", "ftp://nlu");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidSuggestionEndpoint)
        );
    }

    #[test]
    fn test_read_override() {
        assert_eq!(read_override(None).unwrap(), None);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("constants.yaml");
        std::fs::write(&path, "user_id: User").unwrap();
        assert_eq!(
            read_override(Some(&path)).unwrap().as_deref(),
            Some("user_id: User")
        );

        let missing = dir.path().join("absent.yaml");
        assert!(matches!(
            read_override(Some(&missing)),
            Err(ConfigError::ResourceUnreadable { .. })
        ));
    }
}
