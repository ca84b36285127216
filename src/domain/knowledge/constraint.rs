//! Per-field match conditions used to filter records.

use super::predicate::Predicate;
use super::record::Record;
use super::value::{quote, Value};

/// A match condition for one field: literal equality or a predicate.
#[derive(Debug, Clone)]
pub enum Constraint {
    Literal(Value),
    Predicate(Predicate),
}

impl Constraint {
    /// Literal entries need an equal value (absent never matches); predicate
    /// entries see `None` for an absent field and decide for themselves.
    pub fn matches(&self, value: Option<&Value>) -> bool {
        match self {
            Constraint::Literal(expected) => value == Some(expected),
            Constraint::Predicate(predicate) => predicate.test(value),
        }
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Constraint::Literal(value) => Some(value),
            Constraint::Predicate(_) => None,
        }
    }

    /// Expression-language rendering. Predicates are quoted the way workers
    /// write them in a query, e.g. `'atLeast(3)'`.
    pub fn to_expression(&self) -> String {
        match self {
            Constraint::Literal(value) => value.to_expression(),
            Constraint::Predicate(predicate) => quote(&predicate.to_string()),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Constraint::Literal(value) => value.to_json(),
            Constraint::Predicate(predicate) => serde_json::Value::String(predicate.to_string()),
        }
    }
}

impl From<Value> for Constraint {
    fn from(value: Value) -> Self {
        Constraint::Literal(value)
    }
}

impl From<Predicate> for Constraint {
    fn from(predicate: Predicate) -> Self {
        Constraint::Predicate(predicate)
    }
}

impl From<bool> for Constraint {
    fn from(b: bool) -> Self {
        Constraint::Literal(Value::Bool(b))
    }
}

impl From<i64> for Constraint {
    fn from(n: i64) -> Self {
        Constraint::Literal(Value::Int(n))
    }
}

impl From<i32> for Constraint {
    fn from(n: i32) -> Self {
        Constraint::Literal(Value::Int(n as i64))
    }
}

impl From<&str> for Constraint {
    fn from(s: &str) -> Self {
        Constraint::Literal(Value::from(s))
    }
}

impl From<String> for Constraint {
    fn from(s: String) -> Self {
        Constraint::Literal(Value::Text(s))
    }
}

/// An ordered field → constraint mapping, built per query.
///
/// Inserting an existing key replaces its constraint in place.
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    entries: Vec<(String, Constraint)>,
}

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, constraint: impl Into<Constraint>) -> Self {
        self.insert(field, constraint);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, constraint: impl Into<Constraint>) {
        let field = field.into();
        let constraint = constraint.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = constraint,
            None => self.entries.push((field, constraint)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Constraint> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, constraint)| constraint)
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn remove(&mut self, field: &str) -> Option<Constraint> {
        let index = self.entries.iter().position(|(name, _)| name == field)?;
        Some(self.entries.remove(index).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Constraint)> {
        self.entries.iter().map(|(name, c)| (name.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when every entry matches the record.
    pub fn matches(&self, record: &Record) -> bool {
        self.entries
            .iter()
            .all(|(field, constraint)| constraint.matches(record.get(field)))
    }

    /// First of `required` that has no entry, in the given order.
    pub fn first_missing<'a>(&self, required: &'a [impl AsRef<str>]) -> Option<&'a str> {
        required
            .iter()
            .map(|name| AsRef::<str>::as_ref(name))
            .find(|name| !self.contains_key(name))
    }

    /// Renders as the list-of-single-key-maps form used by query payloads.
    pub fn to_expression(&self) -> String {
        let items: Vec<String> = self
            .entries
            .iter()
            .map(|(field, c)| format!("{{{}: {}}}", quote(field), c.to_expression()))
            .collect();
        format!("[{}]", items.join(", "))
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.entries
                .iter()
                .map(|(field, c)| {
                    let mut map = serde_json::Map::new();
                    map.insert(field.clone(), c.to_json());
                    serde_json::Value::Object(map)
                })
                .collect(),
        )
    }
}

impl FromIterator<(String, Constraint)> for Constraints {
    fn from_iter<I: IntoIterator<Item = (String, Constraint)>>(iter: I) -> Self {
        let mut constraints = Constraints::new();
        for (field, constraint) in iter {
            constraints.insert(field, constraint);
        }
        constraints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::RecordId;
    use crate::domain::knowledge::predicate::{at_least, not};

    fn flat() -> Record {
        Record::new(RecordId::new(1))
            .with_field("Level", 4)
            .with_field("HasBalcony", true)
    }

    #[test]
    fn literal_requires_equal_value() {
        assert!(Constraints::new().with("Level", 4).matches(&flat()));
        assert!(!Constraints::new().with("Level", 5).matches(&flat()));
    }

    #[test]
    fn literal_on_absent_field_never_matches() {
        assert!(!Constraints::new()
            .with("BalconySide", "north")
            .matches(&flat()));
    }

    #[test]
    fn predicate_on_absent_field_receives_none() {
        let c = Constraints::new().with("BalconySide", not(at_least("a")));
        assert!(c.matches(&flat()));
    }

    #[test]
    fn empty_constraints_match_everything() {
        assert!(Constraints::new().matches(&flat()));
    }

    #[test]
    fn insert_replaces_existing_key_in_place() {
        let c = Constraints::new()
            .with("A", 1)
            .with("B", 2)
            .with("A", 3);
        assert_eq!(c.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(c.get("A").and_then(Constraint::as_literal), Some(&Value::Int(3)));
    }

    #[test]
    fn first_missing_respects_requirement_order() {
        let c = Constraints::new().with("Time", 19);
        assert_eq!(c.first_missing(&["Name", "Time", "Size"]), Some("Name"));
        assert_eq!(c.first_missing(&["Time"]), None);
    }

    #[test]
    fn renders_query_constraint_list() {
        let c = Constraints::new()
            .with("Level", at_least(3))
            .with("HasBalcony", true);
        assert_eq!(
            c.to_expression(),
            "[{'Level': 'atLeast(3)'}, {'HasBalcony': True}]"
        );
    }
}
