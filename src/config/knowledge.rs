//! Knowledge base generation configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Upper bound on generated records per domain.
pub const MAX_RECORDS_PER_DOMAIN: usize = 100_000;

/// Knowledge base configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct KnowledgeConfig {
    /// Records generated for every domain at start-up
    #[serde(default = "default_records_per_domain")]
    pub records_per_domain: usize,

    /// Seed for deterministic generation; entropy when absent
    pub seed: Option<u64>,

    /// Schema YAML replacing the embedded schemas
    pub schema_path: Option<PathBuf>,
}

impl KnowledgeConfig {
    /// Validate knowledge configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.records_per_domain == 0 || self.records_per_domain > MAX_RECORDS_PER_DOMAIN {
            return Err(ValidationError::InvalidRecordCount {
                max: MAX_RECORDS_PER_DOMAIN,
            });
        }
        if self
            .schema_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(ValidationError::EmptyPath("knowledge.schema_path"));
        }
        Ok(())
    }
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            records_per_domain: default_records_per_domain(),
            seed: None,
            schema_path: None,
        }
    }
}

fn default_records_per_domain() -> usize {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knowledge_config_defaults() {
        let config = KnowledgeConfig::default();
        assert_eq!(config.records_per_domain, 1000);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_record_count() {
        let config = KnowledgeConfig {
            records_per_domain: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = KnowledgeConfig {
            records_per_domain: MAX_RECORDS_PER_DOMAIN + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_empty_schema_path() {
        let config = KnowledgeConfig {
            schema_path: Some(PathBuf::new()),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::EmptyPath("knowledge.schema_path"))
        );
    }
}
