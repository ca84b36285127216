//! Scripted agent - replays fixed lines.
//!
//! Used by tests and the `demo` command. Every message the world delivers
//! is captured in a shared [`AgentRecorder`] that stays readable after the
//! agent has been handed to the world. A script that runs out behaves like
//! a worker who left: the next `act` or `poll` reports the channel closed.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::dialogue::Termination;
use crate::domain::protocol::WireMessage;
use crate::ports::{AgentError, DialogueAgent};

/// Shared view of what a scripted agent received.
#[derive(Debug, Clone, Default)]
pub struct AgentRecorder {
    observed: Arc<Mutex<Vec<WireMessage>>>,
    termination: Arc<Mutex<Option<Termination>>>,
}

impl AgentRecorder {
    /// Messages delivered to the agent, in order.
    pub async fn observed(&self) -> Vec<WireMessage> {
        self.observed.lock().await.clone()
    }

    /// Texts of the delivered messages.
    pub async fn observed_texts(&self) -> Vec<String> {
        self.observed
            .lock()
            .await
            .iter()
            .map(|message| message.text.clone())
            .collect()
    }

    /// How the session ended, once the agent was shut down.
    pub async fn termination(&self) -> Option<Termination> {
        self.termination.lock().await.clone()
    }
}

/// Agent that answers with pre-written lines.
#[derive(Debug)]
pub struct ScriptedAgent {
    worker_id: String,
    script: VecDeque<String>,
    /// Empty polls to report before each scripted line during evaluation.
    idle_polls: usize,
    pending_idle: usize,
    recorder: AgentRecorder,
}

impl ScriptedAgent {
    pub fn new<I, S>(worker_id: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            worker_id: worker_id.into(),
            script: lines.into_iter().map(Into::into).collect(),
            idle_polls: 0,
            pending_idle: 0,
            recorder: AgentRecorder::default(),
        }
    }

    /// Makes `poll` come back empty `count` times before each line.
    pub fn with_idle_polls(mut self, count: usize) -> Self {
        self.idle_polls = count;
        self.pending_idle = count;
        self
    }

    pub fn recorder(&self) -> AgentRecorder {
        self.recorder.clone()
    }

    fn next_line(&mut self) -> Result<WireMessage, AgentError> {
        let line = self.script.pop_front().ok_or(AgentError::Closed)?;
        Ok(WireMessage::new(self.worker_id.as_str(), line))
    }
}

#[async_trait]
impl DialogueAgent for ScriptedAgent {
    fn worker_id(&self) -> &str {
        &self.worker_id
    }

    async fn observe(&mut self, message: &WireMessage) -> Result<(), AgentError> {
        self.recorder.observed.lock().await.push(message.clone());
        Ok(())
    }

    async fn act(&mut self) -> Result<WireMessage, AgentError> {
        self.next_line()
    }

    async fn poll(&mut self) -> Result<Option<WireMessage>, AgentError> {
        if self.pending_idle > 0 {
            self.pending_idle -= 1;
            return Ok(None);
        }
        self.pending_idle = self.idle_polls;
        self.next_line().map(Some)
    }

    async fn shutdown(&mut self, termination: &Termination) {
        *self.recorder.termination.lock().await = Some(termination.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_lines_then_reports_closed() {
        let mut agent = ScriptedAgent::new("worker-1", ["hello", "bye"]);
        assert_eq!(agent.act().await.unwrap().text, "hello");
        assert_eq!(agent.act().await.unwrap().id, "worker-1");
        assert_eq!(agent.act().await.unwrap_err(), AgentError::Closed);
    }

    #[tokio::test]
    async fn idle_polls_come_back_empty_first() {
        let mut agent = ScriptedAgent::new("w", ["done"]).with_idle_polls(2);
        assert_eq!(agent.poll().await.unwrap(), None);
        assert_eq!(agent.poll().await.unwrap(), None);
        assert_eq!(agent.poll().await.unwrap().unwrap().text, "done");
    }

    #[tokio::test]
    async fn recorder_outlives_the_agent() {
        let mut agent = ScriptedAgent::new("w", Vec::<String>::new());
        let recorder = agent.recorder();
        agent.observe(&WireMessage::new("System", "welcome")).await.unwrap();
        agent.shutdown(&Termination::Completed).await;
        drop(agent);
        assert_eq!(recorder.observed_texts().await, vec!["welcome"]);
        assert_eq!(recorder.termination().await, Some(Termination::Completed));
    }
}
