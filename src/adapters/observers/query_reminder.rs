//! Query reminder - nudges a wizard who keeps answering without
//! consulting the knowledge base.

use crate::domain::dialogue::Stage;
use crate::domain::protocol::Role;
use crate::ports::{Injection, TurnObserver, TurnSnapshot};

#[derive(Debug, Clone)]
pub struct QueryReminderObserver {
    /// Wizard utterances since the last query that trigger a nudge.
    threshold: usize,
    text: String,
    /// Event count at the last nudge, so one stretch is nudged once.
    nudged_at: Option<usize>,
}

impl QueryReminderObserver {
    pub fn new(threshold: usize, text: impl Into<String>) -> Self {
        Self {
            threshold,
            text: text.into(),
            nudged_at: None,
        }
    }
}

impl TurnObserver for QueryReminderObserver {
    fn inspect(&mut self, snapshot: &TurnSnapshot<'_>) -> Vec<Injection> {
        if snapshot.stage != Stage::Dialogue || snapshot.active != Role::Wizard {
            return Vec::new();
        }
        let since_query = snapshot
            .events
            .iter()
            .rposition(|event| event.action == "Query")
            .map_or(0, |index| index + 1);
        if self.nudged_at.is_some_and(|at| at >= since_query) {
            return Vec::new();
        }
        let unsupported = snapshot.events[since_query..]
            .iter()
            .filter(|event| event.agent == Role::Wizard && event.action == "Utter")
            .count();
        if unsupported < self.threshold {
            return Vec::new();
        }
        self.nudged_at = Some(snapshot.events.len());
        vec![Injection::new(Role::Wizard, self.text.as_str())]
    }
}
