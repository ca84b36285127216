//! Turn observer adapters.

mod query_reminder;
mod turn_reminder;

pub use query_reminder::QueryReminderObserver;
pub use turn_reminder::TurnReminderObserver;
