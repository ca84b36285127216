//! HTTP suggestion provider - calls an external NLU service.
//!
//! The service receives the [`SuggestionRequest`] as a JSON body and
//! answers `{"suggestions": ["...", ...]}`.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpSuggestionConfig::new("http://nlu.internal/suggest")
//!     .with_timeout(Duration::from_secs(5));
//!
//! let provider = HttpSuggestionProvider::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::ports::{SuggestionError, SuggestionProvider, SuggestionRequest};

/// Configuration for the HTTP provider.
#[derive(Debug, Clone)]
pub struct HttpSuggestionConfig {
    /// Full URL the request is POSTed to.
    pub endpoint: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl HttpSuggestionConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Suggestion provider backed by an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpSuggestionProvider {
    config: HttpSuggestionConfig,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SuggestionResponse {
    #[serde(default)]
    suggestions: Vec<String>,
}

impl HttpSuggestionProvider {
    /// Creates the provider and its HTTP client.
    ///
    /// # Errors
    ///
    /// `Unavailable` if the HTTP client cannot be built.
    pub fn new(config: HttpSuggestionConfig) -> Result<Self, SuggestionError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SuggestionError::Unavailable(format!("HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    async fn send_request(&self, request: &SuggestionRequest) -> Result<Response, SuggestionError> {
        self.client
            .post(&self.config.endpoint)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SuggestionError::Unavailable(format!(
                        "timed out after {}s",
                        self.config.timeout.as_secs()
                    ))
                } else if e.is_connect() {
                    SuggestionError::Unavailable(format!("Connection failed: {}", e))
                } else {
                    SuggestionError::Unavailable(e.to_string())
                }
            })
    }
}

/// Parses a response body.
fn parse_suggestions(body: &str) -> Result<Vec<String>, SuggestionError> {
    serde_json::from_str::<SuggestionResponse>(body)
        .map(|response| response.suggestions)
        .map_err(|e| SuggestionError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl SuggestionProvider for HttpSuggestionProvider {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<String>, SuggestionError> {
        let response = self.send_request(request).await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(SuggestionError::Unavailable(format!(
                "status {}: {}",
                status, body
            )));
        }

        let suggestions = parse_suggestions(&body)?;
        tracing::debug!(
            endpoint = %self.config.endpoint,
            count = suggestions.len(),
            "suggestions received"
        );
        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_suggestion_list() {
        let parsed = parse_suggestions(r#"{"suggestions": ["Hello!", "Which city?"]}"#).unwrap();
        assert_eq!(parsed, vec!["Hello!", "Which city?"]);
    }

    #[test]
    fn missing_list_is_empty() {
        assert!(parse_suggestions("{}").unwrap().is_empty());
    }

    #[test]
    fn non_json_body_is_invalid() {
        assert!(matches!(
            parse_suggestions("<html>"),
            Err(SuggestionError::InvalidResponse(_))
        ));
    }

    #[test]
    fn config_builder_sets_timeout() {
        let config =
            HttpSuggestionConfig::new("http://localhost/suggest").with_timeout(Duration::from_secs(2));
        assert_eq!(config.timeout, Duration::from_secs(2));
        let provider = HttpSuggestionProvider::new(config).unwrap();
        assert_eq!(provider.endpoint(), "http://localhost/suggest");
    }

    #[tokio::test]
    async fn unreachable_service_is_unavailable() {
        let config = HttpSuggestionConfig::new("http://127.0.0.1:9/suggest")
            .with_timeout(Duration::from_secs(2));
        let provider = HttpSuggestionProvider::new(config).unwrap();
        let request = SuggestionRequest {
            draft: "hi".into(),
            history: Vec::new(),
            primary_item: None,
        };
        assert!(matches!(
            provider.suggest(&request).await,
            Err(SuggestionError::Unavailable(_))
        ));
    }
}
