//! Static suggestion provider - a fixed reply list.
//!
//! Stands in for the NLU service in tests and demos. Replies that start
//! with the wizard's draft (case-insensitive) are ranked first.

use async_trait::async_trait;

use crate::ports::{SuggestionError, SuggestionProvider, SuggestionRequest};

#[derive(Debug, Clone, Default)]
pub struct StaticSuggestionProvider {
    suggestions: Vec<String>,
    limit: Option<usize>,
}

impl StaticSuggestionProvider {
    pub fn new<I, S>(suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suggestions: suggestions.into_iter().map(Into::into).collect(),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
impl SuggestionProvider for StaticSuggestionProvider {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<String>, SuggestionError> {
        let draft = request.draft.trim().to_lowercase();
        let (mut ranked, rest): (Vec<String>, Vec<String>) = self
            .suggestions
            .iter()
            .cloned()
            .partition(|s| !draft.is_empty() && s.to_lowercase().starts_with(&draft));
        ranked.extend(rest);
        if let Some(limit) = self.limit {
            ranked.truncate(limit);
        }
        Ok(ranked)
    }
}
