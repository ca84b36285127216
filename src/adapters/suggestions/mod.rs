//! Suggestion provider adapters.

mod http_provider;
mod static_provider;

pub use http_provider::{HttpSuggestionConfig, HttpSuggestionProvider};
pub use static_provider::StaticSuggestionProvider;
