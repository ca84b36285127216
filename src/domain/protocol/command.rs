//! Typed commands.
//!
//! Every message that crosses the dialogue world is one [`Command`]. Worker
//! commands carry the sender role and render both as a wire message and as
//! an event; backend commands are issued by the system and have no event.

use std::fmt;

use serde_json::{Map, Value as Json};

use crate::domain::foundation::Timestamp;
use crate::domain::knowledge::{quote, Constraints, ExpressionError};

use super::constants::ProtocolConstants;
use super::event::EventRecord;
use super::message::WireMessage;
use super::role::Role;

/// The command variants without their payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Utter,
    Silent,
    Query,
    DialogueCompleted,
    TaskDone,
    SelectPrimary,
    SelectSecondary,
    RequestSuggestions,
    PickSuggestion,
    Setup,
    Guide,
    Review,
    SupplySuggestions,
}

impl CommandKind {
    /// The event `Action` name.
    pub fn action(self) -> &'static str {
        match self {
            CommandKind::Utter => "Utter",
            CommandKind::Silent => "Silent",
            CommandKind::Query => "Query",
            CommandKind::DialogueCompleted => "DialogueCompleted",
            CommandKind::TaskDone => "TaskDone",
            CommandKind::SelectPrimary => "SelectPrimary",
            CommandKind::SelectSecondary => "SelectSecondary",
            CommandKind::RequestSuggestions => "RequestSuggestions",
            CommandKind::PickSuggestion => "PickSuggestion",
            CommandKind::Setup => "Setup",
            CommandKind::Guide => "Guide",
            CommandKind::Review => "Review",
            CommandKind::SupplySuggestions => "SupplySuggestions",
        }
    }

    /// Backend commands are issued by the system, never by a worker.
    pub fn is_backend(self) -> bool {
        matches!(
            self,
            CommandKind::Setup
                | CommandKind::Guide
                | CommandKind::Review
                | CommandKind::SupplySuggestions
        )
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

/// A parsed knowledge-base query.
#[derive(Debug, Clone)]
pub struct KbQuery {
    /// Operation or bare domain name (the payload's `db` entry).
    pub api_name: String,
    pub constraints: Constraints,
}

impl KbQuery {
    pub fn new(api_name: impl Into<String>, constraints: Constraints) -> Self {
        Self {
            api_name: api_name.into(),
            constraints,
        }
    }

    /// `{'constraints': [...], 'db': '...'}`
    pub fn to_expression(&self) -> String {
        format!(
            "{{'constraints': {}, 'db': {}}}",
            self.constraints.to_expression(),
            quote(&self.api_name)
        )
    }
}

/// A wizard query. The raw payload is kept so that a malformed query can
/// still be logged and answered with "nothing found".
#[derive(Debug, Clone)]
pub struct QueryCommand {
    pub sender: Role,
    pub raw: String,
    pub parsed: Result<KbQuery, ExpressionError>,
}

impl QueryCommand {
    pub fn from_query(sender: Role, query: KbQuery) -> Self {
        Self {
            sender,
            raw: query.to_expression(),
            parsed: Ok(query),
        }
    }
}

/// Every command exchanged in a dialogue session.
#[derive(Debug, Clone)]
pub enum Command {
    Utter { sender: Role, text: String },
    Silent { sender: Role },
    Query(QueryCommand),
    DialogueCompleted { sender: Role },
    /// Evaluation answers, sorted by question index.
    TaskDone { sender: Role, answers: Vec<(u32, bool)> },
    SelectPrimary { sender: Role, item: Json },
    SelectSecondary { sender: Role, item: Json },
    RequestSuggestions { sender: Role, draft: String },
    PickSuggestion { sender: Role, text: String },

    Setup { recipient: Role, task: String },
    Guide { text: String },
    Review { questions: Vec<String> },
    SupplySuggestions { suggestions: Vec<String> },
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Utter { .. } => CommandKind::Utter,
            Command::Silent { .. } => CommandKind::Silent,
            Command::Query(_) => CommandKind::Query,
            Command::DialogueCompleted { .. } => CommandKind::DialogueCompleted,
            Command::TaskDone { .. } => CommandKind::TaskDone,
            Command::SelectPrimary { .. } => CommandKind::SelectPrimary,
            Command::SelectSecondary { .. } => CommandKind::SelectSecondary,
            Command::RequestSuggestions { .. } => CommandKind::RequestSuggestions,
            Command::PickSuggestion { .. } => CommandKind::PickSuggestion,
            Command::Setup { .. } => CommandKind::Setup,
            Command::Guide { .. } => CommandKind::Guide,
            Command::Review { .. } => CommandKind::Review,
            Command::SupplySuggestions { .. } => CommandKind::SupplySuggestions,
        }
    }

    /// The sending role; `None` for backend commands.
    pub fn sender(&self) -> Option<Role> {
        match self {
            Command::Utter { sender, .. }
            | Command::Silent { sender }
            | Command::Query(QueryCommand { sender, .. })
            | Command::DialogueCompleted { sender }
            | Command::TaskDone { sender, .. }
            | Command::SelectPrimary { sender, .. }
            | Command::SelectSecondary { sender, .. }
            | Command::RequestSuggestions { sender, .. }
            | Command::PickSuggestion { sender, .. } => Some(*sender),
            Command::Setup { .. }
            | Command::Guide { .. }
            | Command::Review { .. }
            | Command::SupplySuggestions { .. } => None,
        }
    }

    /// The outbound wire message.
    ///
    /// Utterances are sent verbatim, so an utterance that itself starts with
    /// a command prefix decodes as that command on the other side.
    pub fn to_message(&self, constants: &ProtocolConstants) -> WireMessage {
        let id = constants.agent_id(self.sender().unwrap_or(Role::System));
        let prefixed = |kind: CommandKind, payload: &str| {
            let prefix = constants.prefix_for(kind).unwrap_or_default();
            if payload.is_empty() {
                prefix.to_string()
            } else {
                format!("{} {}", prefix, payload)
            }
        };
        match self {
            Command::Utter { text, .. } => WireMessage::new(id, text.as_str()),
            Command::Silent { .. } => WireMessage::new(id, prefixed(CommandKind::Silent, "")),
            Command::Query(query) => {
                WireMessage::new(id, prefixed(CommandKind::Query, &query.raw))
            }
            Command::DialogueCompleted { .. } => {
                WireMessage::new(id, prefixed(CommandKind::DialogueCompleted, ""))
            }
            Command::TaskDone { answers, .. } => {
                let payload = Json::Object(answers_to_json(answers)).to_string();
                WireMessage::new(id, prefixed(CommandKind::TaskDone, &payload))
            }
            Command::SelectPrimary { item, .. } => WireMessage::new(
                id,
                prefixed(CommandKind::SelectPrimary, &selection_payload(item)),
            ),
            Command::SelectSecondary { item, .. } => WireMessage::new(
                id,
                prefixed(CommandKind::SelectSecondary, &selection_payload(item)),
            ),
            Command::RequestSuggestions { draft, .. } => {
                WireMessage::new(id, prefixed(CommandKind::RequestSuggestions, draft))
            }
            Command::PickSuggestion { text, .. } => {
                WireMessage::new(id, prefixed(CommandKind::PickSuggestion, text))
            }
            Command::Setup { recipient, task } => WireMessage::new(id, task.as_str())
                .with("command", constants.command_setup.as_str())
                .with("role", recipient.to_string()),
            Command::Guide { text } => WireMessage::new(id, text.as_str()),
            Command::Review { questions } => WireMessage::new(id, "")
                .with("command", constants.command_review.as_str())
                .with("questions", questions.clone()),
            Command::SupplySuggestions { suggestions } => WireMessage::new(id, "")
                .with("command", constants.command_supply_suggestions.as_str())
                .with("suggestions", suggestions.clone()),
        }
    }

    /// The loggable event; `None` for backend commands. Selection fields
    /// are left empty for the session to fill in.
    pub fn to_event(&self, at: Timestamp) -> Option<EventRecord> {
        let sender = self.sender()?;
        let event = EventRecord::new(sender, self.kind().action(), at);
        Some(match self {
            Command::Utter { text, .. } | Command::PickSuggestion { text, .. } => {
                event.with("Text", text.as_str())
            }
            Command::Query(query) => {
                let event = event.with("Text", query.raw.as_str());
                match &query.parsed {
                    Ok(parsed) => event
                        .with("ApiName", parsed.api_name.as_str())
                        .with("Constraints", parsed.constraints.to_json()),
                    Err(err) => event.with("Error", err.to_string()),
                }
            }
            Command::TaskDone { answers, .. } => event.with("Answers", answers_to_json(answers)),
            Command::SelectPrimary { item, .. } | Command::SelectSecondary { item, .. } => {
                event.with("Item", item.clone())
            }
            Command::RequestSuggestions { draft, .. } => event.with("Draft", draft.as_str()),
            Command::Silent { .. }
            | Command::DialogueCompleted { .. }
            | Command::Setup { .. }
            | Command::Guide { .. }
            | Command::Review { .. }
            | Command::SupplySuggestions { .. } => event,
        })
    }
}

fn answers_to_json(answers: &[(u32, bool)]) -> Map<String, Json> {
    answers
        .iter()
        .map(|(index, answer)| (index.to_string(), Json::Bool(*answer)))
        .collect()
}

/// `<label>|<json>`; the label is informational only.
fn selection_payload(item: &Json) -> String {
    let label = item
        .get("Name")
        .or_else(|| item.get("id"))
        .map(|v| match v {
            Json::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_default();
    format!("{}|{}", label.replace('|', "/"), item)
}
