//! Transcript storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Storage configuration
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Directory for JSON transcripts; in-memory storage when absent
    pub transcript_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self
            .transcript_dir
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(ValidationError::EmptyPath("storage.transcript_dir"));
        }
        Ok(())
    }
}
