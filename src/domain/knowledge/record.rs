//! Generated knowledge-base records.

use std::hash::{Hash, Hasher};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::domain::foundation::RecordId;

use super::value::Value;

/// One synthetic row: an identifier plus the fields sampled for it, in
/// declaration order. Fields whose schema entry was disabled are absent.
///
/// Equality and hashing use the identifier only.
#[derive(Debug, Clone)]
pub struct Record {
    id: RecordId,
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Creates an empty record; the generator fills it field by field.
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            fields: Vec::new(),
        }
    }

    /// Builder used by fixtures to create records with known contents.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// JSON object with `id` followed by every present field.
    pub fn to_json(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        map.insert("id".to_string(), serde_json::Value::from(self.id.value()));
        for (name, value) in &self.fields {
            map.insert(name.clone(), value.to_json());
        }
        map
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("id", &self.id)?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_uses_identifier_only() {
        let a = Record::new(RecordId::new(1)).with_field("Level", 3);
        let b = Record::new(RecordId::new(1)).with_field("Level", 9);
        let c = Record::new(RecordId::new(2)).with_field("Level", 3);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn insert_overwrites_existing_field() {
        let record = Record::new(RecordId::new(0))
            .with_field("Name", "A")
            .with_field("Name", "B");
        assert_eq!(record.get("Name"), Some(&Value::from("B")));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn serializes_id_first_then_fields() {
        let record = Record::new(RecordId::new(7))
            .with_field("Name", "Loft")
            .with_field("HasBalcony", false);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":7,"Name":"Loft","HasBalcony":false}"#);
    }
}
