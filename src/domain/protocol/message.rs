//! Wire messages exchanged with the messaging transport.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

/// `{id, text, ...}` as sent to or received from a worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub id: String,
    pub text: String,
    #[serde(flatten)]
    pub fields: Map<String, Json>,
}

impl WireMessage {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            fields: Map::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Json>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Json> {
        self.fields.get(key)
    }
}
