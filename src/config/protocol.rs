//! Protocol constants configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Protocol configuration
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ProtocolConfig {
    /// Constants YAML replacing the embedded prefixes and texts
    pub constants_path: Option<PathBuf>,
}

impl ProtocolConfig {
    /// Validate protocol configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self
            .constants_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(ValidationError::EmptyPath("protocol.constants_path"));
        }
        Ok(())
    }
}
