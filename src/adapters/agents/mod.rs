//! Dialogue agent adapters.

mod channel;
mod scripted;

pub use channel::{channel_agent, ChannelAgent, WorkerEndpoint};
pub use scripted::{AgentRecorder, ScriptedAgent};
