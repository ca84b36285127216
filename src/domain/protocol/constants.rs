//! Protocol constants.
//!
//! Prefixes, command tags and agent ids are data, not code, so that a
//! deployment can localise or version them. The defaults are embedded from
//! `resources/constants.yaml`; `protocol.constants_path` overrides them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::command::CommandKind;
use super::errors::CodecError;
use super::role::Role;

const STANDARD_CONSTANTS: &str = include_str!("../../../resources/constants.yaml");

/// Every constant the codec and the dialogue world rely on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolConstants {
    pub complete_prefix: String,
    pub done_prefix: String,
    pub query_prefix: String,
    pub select_kb_entry_prefix: String,
    pub select_reference_kb_entry_prefix: String,
    pub request_suggestions_prefix: String,
    pub pick_suggestion_prefix: String,
    pub silent_prefix: String,

    pub command_setup: String,
    pub command_review: String,
    pub command_supply_suggestions: String,

    pub system_id: String,
    pub wizard_id: String,
    pub user_id: String,
    pub knowledgebase_id: String,

    #[serde(default)]
    pub disconnect_sentinels: Vec<String>,
    #[serde(default)]
    pub evaluation_questions: Vec<String>,
    #[serde(default)]
    pub evaluation_guide: String,
    #[serde(default)]
    pub evaluation_reminder: String,
}

impl ProtocolConstants {
    /// The embedded defaults.
    pub fn standard() -> Result<Self, CodecError> {
        Self::from_yaml(STANDARD_CONSTANTS)
    }

    /// Parses and validates a constants document.
    ///
    /// # Errors
    ///
    /// `Constants` if the YAML is malformed, a prefix is empty, or two
    /// prefixes are identical.
    pub fn from_yaml(yaml: &str) -> Result<Self, CodecError> {
        let constants: Self =
            serde_yaml::from_str(yaml).map_err(|e| CodecError::Constants(e.to_string()))?;
        constants.validate()?;
        Ok(constants)
    }

    fn validate(&self) -> Result<(), CodecError> {
        let mut seen = HashSet::new();
        for (prefix, kind) in self.prefix_table() {
            if prefix.trim().is_empty() {
                return Err(CodecError::Constants(format!("empty prefix for {}", kind)));
            }
            if !seen.insert(prefix) {
                return Err(CodecError::Constants(format!("duplicate prefix '{}'", prefix)));
            }
        }
        Ok(())
    }

    /// Worker-message prefixes in match order; the first match wins.
    pub fn prefix_table(&self) -> [(&str, CommandKind); 8] {
        [
            (self.complete_prefix.as_str(), CommandKind::DialogueCompleted),
            (self.done_prefix.as_str(), CommandKind::TaskDone),
            (self.query_prefix.as_str(), CommandKind::Query),
            (
                self.select_reference_kb_entry_prefix.as_str(),
                CommandKind::SelectSecondary,
            ),
            (self.select_kb_entry_prefix.as_str(), CommandKind::SelectPrimary),
            (
                self.request_suggestions_prefix.as_str(),
                CommandKind::RequestSuggestions,
            ),
            (self.pick_suggestion_prefix.as_str(), CommandKind::PickSuggestion),
            (self.silent_prefix.as_str(), CommandKind::Silent),
        ]
    }

    pub fn prefix_for(&self, kind: CommandKind) -> Option<&str> {
        self.prefix_table()
            .into_iter()
            .find(|(_, candidate)| *candidate == kind)
            .map(|(prefix, _)| prefix)
    }

    /// True when the text signals that a worker left the session.
    pub fn is_disconnect(&self, text: &str) -> bool {
        let text = text.trim();
        self.disconnect_sentinels.iter().any(|s| s == text)
    }

    pub fn agent_id(&self, role: Role) -> &str {
        match role {
            Role::User => &self.user_id,
            Role::Wizard => &self.wizard_id,
            Role::KnowledgeBase => &self.knowledgebase_id,
            Role::System => &self.system_id,
        }
    }

    pub fn role_of(&self, id: &str) -> Option<Role> {
        [Role::User, Role::Wizard, Role::KnowledgeBase, Role::System]
            .into_iter()
            .find(|role| self.agent_id(*role) == id)
    }
}
