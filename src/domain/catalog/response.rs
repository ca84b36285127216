//! Shaped operation responses.

use serde::Serialize;
use serde_json::{Map, Value as Json};

use crate::domain::knowledge::Record;

/// The result of a catalog operation: a flat item map plus the number of
/// knowledge-base records that matched.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ApiResponse {
    pub item: Map<String, Json>,
    pub count: usize,
    /// Set when the call was recovered into a failure response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_parameter: Option<String>,
}

impl ApiResponse {
    /// No match: empty item, zero count.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_record(record: &Record, count: usize) -> Self {
        Self {
            item: record.to_json(),
            count,
            missing_parameter: None,
        }
    }

    /// A status-only map, e.g. `{"ReservationStatus": "failed"}`.
    pub fn status_only(key: &str, value: &str) -> Self {
        Self::empty().with(key, value)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Json>) -> Self {
        self.item.insert(key.into(), value.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_missing_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.missing_parameter = Some(parameter.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Json> {
        self.item.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.item.is_empty()
    }
}
