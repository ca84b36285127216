//! Ports - Interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the dialogue engine and the outside world. Adapters implement these ports.
//!
//! ## Session Ports
//!
//! - `DialogueAgent` - One role's messaging transport (observe / act / poll)
//! - `TurnObserver` - Per-turn observers that may inject guidance
//!
//! ## Service Ports
//!
//! - `SuggestionProvider` - NLU service proposing wizard replies
//! - `TranscriptStore` - Persistence of finished sessions

mod dialogue_agent;
mod suggestion_provider;
mod transcript_store;
mod turn_observer;

pub use dialogue_agent::{AgentError, DialogueAgent};
pub use suggestion_provider::{SuggestionError, SuggestionProvider, SuggestionRequest};
pub use transcript_store::{TranscriptStore, TranscriptStoreError};
pub use turn_observer::{Injection, TurnObserver, TurnSnapshot};
