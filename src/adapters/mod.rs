//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the dialogue engine to external systems:
//! - `agents` - Role transports (scripted lines, tokio channels)
//! - `observers` - Per-turn guidance (turn and query reminders)
//! - `storage` - Transcript stores (in-memory, JSON files)
//! - `suggestions` - Reply suggestion services (static list, HTTP)

pub mod agents;
pub mod observers;
pub mod storage;
pub mod suggestions;

pub use agents::{channel_agent, AgentRecorder, ChannelAgent, ScriptedAgent, WorkerEndpoint};
pub use observers::{QueryReminderObserver, TurnReminderObserver};
pub use storage::{InMemoryTranscriptStore, JsonFileTranscriptStore};
pub use suggestions::{HttpSuggestionConfig, HttpSuggestionProvider, StaticSuggestionProvider};
