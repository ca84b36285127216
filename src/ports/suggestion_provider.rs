//! SuggestionProvider port - Opaque NLU service proposing wizard replies.
//!
//! When the wizard sends a suggestion request the world asks this port for
//! candidate replies and hands them back to the wizard. Which service (if
//! any) produces them is a deployment concern.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// Context sent to the suggestion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    /// The wizard's partial reply.
    pub draft: String,
    /// Utterances so far, oldest first.
    pub history: Vec<String>,
    /// The knowledge-base item the wizard has selected, if any.
    pub primary_item: Option<Json>,
}

/// Errors from a suggestion service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SuggestionError {
    #[error("suggestion service unavailable: {0}")]
    Unavailable(String),

    #[error("invalid suggestion response: {0}")]
    InvalidResponse(String),
}

/// Port for reply suggestions.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Proposes candidate replies. An empty list is a valid answer.
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<String>, SuggestionError>;
}
