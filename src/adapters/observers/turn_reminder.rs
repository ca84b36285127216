//! Turn reminder - tells both roles once that they may wrap up.

use crate::domain::dialogue::Stage;
use crate::domain::protocol::Role;
use crate::ports::{Injection, TurnObserver, TurnSnapshot};

#[derive(Debug, Clone)]
pub struct TurnReminderObserver {
    remind_at: u32,
    text: String,
    sent: bool,
}

impl TurnReminderObserver {
    pub fn new(remind_at: u32, text: impl Into<String>) -> Self {
        Self {
            remind_at,
            text: text.into(),
            sent: false,
        }
    }
}

impl TurnObserver for TurnReminderObserver {
    fn inspect(&mut self, snapshot: &TurnSnapshot<'_>) -> Vec<Injection> {
        if self.sent || snapshot.stage != Stage::Dialogue || snapshot.turn < self.remind_at {
            return Vec::new();
        }
        self.sent = true;
        vec![
            Injection::new(Role::User, self.text.as_str()),
            Injection::new(Role::Wizard, self.text.as_str()),
        ]
    }
}
