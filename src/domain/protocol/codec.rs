//! Command codec - worker text to [`Command`] and back.

use std::sync::Arc;

use serde_json::Value as Json;

use crate::domain::knowledge::expression;
use crate::domain::knowledge::ExpressionError;

use super::command::{Command, CommandKind, KbQuery, QueryCommand};
use super::constants::ProtocolConstants;
use super::errors::CodecError;
use super::message::WireMessage;
use super::role::Role;

/// Decodes worker messages and encodes commands, driven by the configured
/// prefix table.
#[derive(Debug, Clone)]
pub struct CommandCodec {
    constants: Arc<ProtocolConstants>,
}

impl CommandCodec {
    pub fn new(constants: Arc<ProtocolConstants>) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &ProtocolConstants {
        &self.constants
    }

    /// Decodes text sent by `sender`.
    ///
    /// The first matching prefix selects the variant; anything else is an
    /// utterance carrying the full text. A malformed query payload is kept
    /// on the [`QueryCommand`] rather than failing the decode.
    ///
    /// # Errors
    ///
    /// `MalformedPayload` for an unparseable evaluation or selection payload.
    pub fn decode(&self, text: &str, sender: Role) -> Result<Command, CodecError> {
        let matched = self
            .constants
            .prefix_table()
            .into_iter()
            .find(|(prefix, _)| text.starts_with(prefix));
        let Some((prefix, kind)) = matched else {
            return Ok(Command::Utter {
                sender,
                text: text.to_string(),
            });
        };
        let payload = text[prefix.len()..].trim();

        Ok(match kind {
            CommandKind::DialogueCompleted => Command::DialogueCompleted { sender },
            CommandKind::Silent => Command::Silent { sender },
            CommandKind::TaskDone => Command::TaskDone {
                sender,
                answers: decode_answers(payload)?,
            },
            CommandKind::Query => Command::Query(QueryCommand {
                sender,
                raw: payload.to_string(),
                parsed: decode_query(payload),
            }),
            CommandKind::SelectPrimary => Command::SelectPrimary {
                sender,
                item: decode_selection(kind, payload)?,
            },
            CommandKind::SelectSecondary => Command::SelectSecondary {
                sender,
                item: decode_selection(kind, payload)?,
            },
            CommandKind::RequestSuggestions => Command::RequestSuggestions {
                sender,
                draft: payload.to_string(),
            },
            CommandKind::PickSuggestion => Command::PickSuggestion {
                sender,
                text: payload.to_string(),
            },
            CommandKind::Utter
            | CommandKind::Setup
            | CommandKind::Guide
            | CommandKind::Review
            | CommandKind::SupplySuggestions => Command::Utter {
                sender,
                text: text.to_string(),
            },
        })
    }

    /// Decodes a wire message, taking the sender from its id.
    pub fn decode_message(&self, message: &WireMessage) -> Result<Command, CodecError> {
        let sender = self
            .constants
            .role_of(&message.id)
            .ok_or_else(|| CodecError::UnknownSender(message.id.clone()))?;
        self.decode(&message.text, sender)
    }

    pub fn encode(&self, command: &Command) -> WireMessage {
        command.to_message(&self.constants)
    }
}

/// `{'constraints': [{'Field': value}, ...], 'db': 'domain'}`
fn decode_query(payload: &str) -> Result<KbQuery, ExpressionError> {
    let entries = expression::parse(payload)?.into_map()?;
    let mut constraints = None;
    let mut db = None;
    for (key, value) in entries {
        match key.as_str() {
            "constraints" => constraints = Some(expression::parse_constraint_list(value)?),
            "db" => db = Some(value.into_text()?),
            _ => {}
        }
    }
    let missing = |key: &str| ExpressionError::Shape {
        expected: format!("'{}' entry", key),
        found: "query without it".to_string(),
    };
    Ok(KbQuery {
        api_name: db.ok_or_else(|| missing("db"))?,
        constraints: constraints.ok_or_else(|| missing("constraints"))?,
    })
}

/// A JSON object of question index to answer, sorted by index.
fn decode_answers(payload: &str) -> Result<Vec<(u32, bool)>, CodecError> {
    let malformed = |reason: String| CodecError::malformed("TaskDone", reason);
    let object = match serde_json::from_str::<Json>(payload) {
        Ok(Json::Object(object)) => object,
        Ok(other) => return Err(malformed(format!("expected an object, found {}", other))),
        Err(e) => return Err(malformed(e.to_string())),
    };
    let mut answers = object
        .into_iter()
        .map(|(index, answer)| {
            let index = index
                .trim()
                .parse::<u32>()
                .map_err(|_| malformed(format!("question index '{}' is not a number", index)))?;
            let answer = answer
                .as_bool()
                .ok_or_else(|| malformed(format!("answer to question {} is not a boolean", index)))?;
            Ok((index, answer))
        })
        .collect::<Result<Vec<_>, CodecError>>()?;
    answers.sort_by_key(|(index, _)| *index);
    Ok(answers)
}

/// `<ignored>|<json-item>`, split once on the first pipe.
fn decode_selection(kind: CommandKind, payload: &str) -> Result<Json, CodecError> {
    let command = kind.action();
    let (_, item) = payload
        .split_once('|')
        .ok_or_else(|| CodecError::malformed(command, "expected '<label>|<item>'"))?;
    serde_json::from_str(item.trim()).map_err(|e| CodecError::malformed(command, e.to_string()))
}
