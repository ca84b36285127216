//! Knowledge-base oracle - the in-process role that answers wizard queries.

use std::sync::Arc;

use rand::rngs::StdRng;
use serde_json::Value as Json;

use crate::domain::catalog::DomainCatalog;
use crate::domain::foundation::Timestamp;
use crate::domain::protocol::{EventRecord, ProtocolConstants, QueryCommand, Role, WireMessage};

/// The oracle's answer to one query.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleReply {
    pub text: String,
    /// Example item, or the status map of a failed call.
    pub item: Option<Json>,
    pub count: usize,
    /// Why the query could not be answered, if it could not.
    pub error: Option<String>,
    pub missing_parameter: Option<String>,
}

impl OracleReply {
    fn nothing_found(error: Option<String>) -> Self {
        Self {
            text: NO_RESULTS.to_string(),
            item: None,
            count: 0,
            error,
            missing_parameter: None,
        }
    }

    /// True when the item is a matched record rather than a status-only
    /// failure map.
    pub fn is_match(&self) -> bool {
        self.count > 0 && self.missing_parameter.is_none() && self.item.is_some()
    }

    /// Where the wizard's primary selection moves after this reply.
    pub fn selection(&self) -> Option<Json> {
        self.item.clone().filter(|_| self.is_match())
    }

    /// The message delivered to the wizard.
    pub fn to_message(&self, constants: &ProtocolConstants) -> WireMessage {
        let message = WireMessage::new(constants.knowledgebase_id.as_str(), self.text.as_str())
            .with("example_item", self.item.clone().unwrap_or(Json::Null))
            .with("count", self.count);
        match &self.missing_parameter {
            Some(parameter) => message.with("missing_parameter", parameter.as_str()),
            None => message,
        }
    }

    /// The `QueryResult` event logged after the query itself.
    pub fn to_event(&self, at: Timestamp) -> EventRecord {
        let event = EventRecord::new(Role::KnowledgeBase, "QueryResult", at)
            .with("Text", self.text.as_str())
            .with("Count", self.count);
        match &self.error {
            Some(error) => event.with("Error", error.as_str()),
            None => event,
        }
    }
}

const NO_RESULTS: &str = "No results found.";

/// Answers queries from the shared catalog with its own random source.
#[derive(Debug)]
pub struct KnowledgeBaseOracle {
    catalog: Arc<DomainCatalog>,
    rng: StdRng,
}

impl KnowledgeBaseOracle {
    pub fn new(catalog: Arc<DomainCatalog>, rng: StdRng) -> Self {
        Self { catalog, rng }
    }

    pub fn catalog(&self) -> &DomainCatalog {
        &self.catalog
    }

    /// Runs the query. Malformed queries and failed calls are answered with
    /// "nothing found" and logged; they never end the session.
    pub fn answer(&mut self, query: &QueryCommand) -> OracleReply {
        let parsed = match &query.parsed {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(query = %query.raw, error = %err, "malformed knowledge-base query");
                return OracleReply::nothing_found(Some(err.to_string()));
            }
        };
        let response = match self
            .catalog
            .call(&parsed.api_name, &parsed.constraints, &mut self.rng)
        {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(api = %parsed.api_name, error = %err, "knowledge-base query failed");
                return OracleReply::nothing_found(Some(err.to_string()));
            }
        };
        let mut reply = OracleReply {
            text: NO_RESULTS.to_string(),
            count: response.count,
            missing_parameter: response.missing_parameter,
            item: if response.item.is_empty() {
                None
            } else {
                Some(Json::Object(response.item))
            },
            error: None,
        };
        if reply.is_match() {
            reply.text = format!("{} result(s) found.", reply.count);
        }
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge::predicate::at_least;
    use crate::domain::knowledge::{Constraints, ExpressionError};
    use crate::domain::protocol::KbQuery;
    use rand::SeedableRng;
    use serde_json::json;

    fn oracle() -> KnowledgeBaseOracle {
        let catalog = DomainCatalog::standard(50, &mut StdRng::seed_from_u64(7)).unwrap();
        KnowledgeBaseOracle::new(Arc::new(catalog), StdRng::seed_from_u64(8))
    }

    fn query(api: &str, constraints: Constraints) -> QueryCommand {
        QueryCommand::from_query(Role::Wizard, KbQuery::new(api, constraints))
    }

    #[test]
    fn bare_domain_query_returns_an_example_and_count() {
        let reply = oracle().answer(&query("apartment", Constraints::new()));
        assert_eq!(reply.count, 50);
        assert_eq!(reply.text, "50 result(s) found.");
        assert!(reply.item.is_some());
        assert!(reply.error.is_none());
    }

    #[test]
    fn impossible_constraints_find_nothing() {
        let reply = oracle().answer(&query(
            "apartment",
            Constraints::new().with("Level", at_least(100)),
        ));
        assert_eq!(reply.text, "No results found.");
        assert_eq!(reply.item, None);
        assert_eq!(reply.count, 0);
    }

    #[test]
    fn recovered_failure_map_is_not_a_result() {
        let reply = oracle().answer(&query(
            "restaurant_reserve",
            Constraints::new().with("Time", 19).with("Size", 2),
        ));
        assert_eq!(reply.text, "No results found.");
        assert_eq!(reply.missing_parameter.as_deref(), Some("Name"));
        assert_eq!(reply.item, Some(json!({"ReservationStatus": "failed"})));
        assert!(!reply.is_match());
        assert_eq!(reply.selection(), None);
    }

    #[test]
    fn matched_record_becomes_the_selection() {
        let reply = oracle().answer(&query("apartment", Constraints::new()));
        assert!(reply.is_match());
        assert_eq!(reply.selection(), reply.item);
    }

    #[test]
    fn malformed_query_is_answered_not_raised() {
        let malformed = QueryCommand {
            sender: Role::Wizard,
            raw: "{'db': ".into(),
            parsed: Err(ExpressionError::UnexpectedEnd),
        };
        let reply = oracle().answer(&malformed);
        assert_eq!(reply.text, "No results found.");
        assert!(reply.error.is_some());
        assert!(reply.to_event(Timestamp::from_unix(1)).field("Error").is_some());
    }

    #[test]
    fn unknown_api_is_answered_not_raised() {
        let reply = oracle().answer(&query("submarine", Constraints::new()));
        assert_eq!(reply.count, 0);
        assert!(reply.error.unwrap().contains("submarine"));
    }

    #[test]
    fn reply_message_comes_from_the_knowledge_base() {
        let constants = ProtocolConstants::standard().unwrap();
        let reply = oracle().answer(&query("apartment", Constraints::new()));
        let message = reply.to_message(&constants);
        assert_eq!(message.id, constants.knowledgebase_id);
        assert_eq!(message.field("count"), Some(&json!(50)));
        assert!(message.field("example_item").is_some_and(Json::is_object));
    }
}
