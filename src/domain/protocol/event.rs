//! Loggable event records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use crate::domain::foundation::Timestamp;

use super::role::Role;

/// One entry of a session's event log.
///
/// `PrimaryItem` and `SecondaryItem` are always present (possibly null) so
/// that every entry records what the wizard had selected at the time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventRecord {
    pub agent: Role,
    pub action: String,
    pub unix_time: f64,
    #[serde(flatten)]
    pub fields: Map<String, Json>,
    #[serde(default)]
    pub primary_item: Option<Json>,
    #[serde(default)]
    pub secondary_item: Option<Json>,
}

impl EventRecord {
    pub fn new(agent: Role, action: impl Into<String>, at: Timestamp) -> Self {
        Self {
            agent,
            action: action.into(),
            unix_time: at.unix_time(),
            fields: Map::new(),
            primary_item: None,
            secondary_item: None,
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Json>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_selection(mut self, primary: Option<Json>, secondary: Option<Json>) -> Self {
        self.primary_item = primary;
        self.secondary_item = secondary;
        self
    }

    pub fn field(&self, key: &str) -> Option<&Json> {
        self.fields.get(key)
    }
}
