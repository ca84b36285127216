//! Channel agent - a role backed by tokio mpsc channels.
//!
//! The world side implements [`DialogueAgent`]; the [`WorkerEndpoint`] is
//! handed to whatever transport carries the worker's messages (a websocket
//! bridge, a terminal, a bot task). Dropping the endpoint disconnects the
//! role; shutting the agent down closes the endpoint's inbound stream.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use crate::domain::dialogue::Termination;
use crate::domain::protocol::WireMessage;
use crate::ports::{AgentError, DialogueAgent};

/// World side of a channel-backed role.
#[derive(Debug)]
pub struct ChannelAgent {
    worker_id: String,
    from_worker: mpsc::Receiver<WireMessage>,
    to_worker: Option<mpsc::Sender<WireMessage>>,
}

/// Worker side of a channel-backed role.
#[derive(Debug)]
pub struct WorkerEndpoint {
    worker_id: String,
    to_world: mpsc::Sender<WireMessage>,
    from_world: mpsc::Receiver<WireMessage>,
}

/// Creates a connected agent / endpoint pair.
pub fn channel_agent(worker_id: impl Into<String>, capacity: usize) -> (ChannelAgent, WorkerEndpoint) {
    let worker_id = worker_id.into();
    let (to_world, from_worker) = mpsc::channel(capacity);
    let (to_worker, from_world) = mpsc::channel(capacity);
    (
        ChannelAgent {
            worker_id: worker_id.clone(),
            from_worker,
            to_worker: Some(to_worker),
        },
        WorkerEndpoint {
            worker_id,
            to_world,
            from_world,
        },
    )
}

impl WorkerEndpoint {
    /// Sends a line of text to the world.
    ///
    /// # Errors
    ///
    /// `Closed` once the session has shut the role down.
    pub async fn send(&self, text: impl Into<String>) -> Result<(), AgentError> {
        self.to_world
            .send(WireMessage::new(self.worker_id.as_str(), text))
            .await
            .map_err(|_| AgentError::Closed)
    }

    /// Next message from the world; `None` once the session is over.
    pub async fn recv(&mut self) -> Option<WireMessage> {
        self.from_world.recv().await
    }
}

#[async_trait]
impl DialogueAgent for ChannelAgent {
    fn worker_id(&self) -> &str {
        &self.worker_id
    }

    async fn observe(&mut self, message: &WireMessage) -> Result<(), AgentError> {
        let sender = self.to_worker.as_ref().ok_or(AgentError::Closed)?;
        sender
            .send(message.clone())
            .await
            .map_err(|_| AgentError::Closed)
    }

    async fn act(&mut self) -> Result<WireMessage, AgentError> {
        self.from_worker.recv().await.ok_or(AgentError::Closed)
    }

    async fn poll(&mut self) -> Result<Option<WireMessage>, AgentError> {
        match self.from_worker.try_recv() {
            Ok(message) => Ok(Some(message)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(AgentError::Closed),
        }
    }

    async fn shutdown(&mut self, termination: &Termination) {
        tracing::debug!(
            worker_id = %self.worker_id,
            completed = termination.is_completed(),
            "closing worker channel"
        );
        self.to_worker = None;
        self.from_worker.close();
    }
}
