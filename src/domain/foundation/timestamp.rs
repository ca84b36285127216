//! Timestamp value object for immutable points in time.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Creates a timestamp from whole seconds since the Unix epoch.
    ///
    /// Out-of-range values clamp to the epoch.
    pub fn from_unix(seconds: i64) -> Self {
        Self(
            Utc.timestamp_opt(seconds, 0)
                .single()
                .unwrap_or_default(),
        )
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Seconds since the Unix epoch, with sub-second precision.
    ///
    /// This is the `UnixTime` written into every logged event.
    pub fn unix_time(&self) -> f64 {
        self.0.timestamp_millis() as f64 / 1000.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_unix_round_trips_whole_seconds() {
        let ts = Timestamp::from_unix(1_700_000_000);
        assert_eq!(ts.unix_time(), 1_700_000_000.0);
    }

    #[test]
    fn now_is_after_epoch() {
        let epoch = Timestamp::from_unix(0);
        assert!(epoch.is_before(&Timestamp::now()));
    }

    #[test]
    fn serializes_as_rfc3339() {
        let ts = Timestamp::from_unix(0);
        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.starts_with("\"1970-01-01T00:00:00"));
    }
}
