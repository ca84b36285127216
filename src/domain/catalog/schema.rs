//! Declarative domain schemas loaded from YAML.
//!
//! The built-in schemas ship embedded in the binary; a deployment may point
//! `knowledge.schema_path` at its own file with the same layout.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::knowledge::expression::constraint_from_value;
use crate::domain::knowledge::{Bound, Constraints, FieldSpec, KnowledgeError, Schema, Value};

use super::errors::CatalogError;

/// The schemas every standard catalog starts from.
pub const STANDARD_SCHEMAS: &str = include_str!("../../../resources/schemas.yaml");

#[derive(Debug, Deserialize)]
struct SchemaDocument {
    domains: Vec<DomainEntry>,
}

#[derive(Debug, Deserialize)]
struct DomainEntry {
    name: String,
    #[serde(default)]
    required: Vec<String>,
    fields: Vec<FieldEntry>,
}

#[derive(Debug, Deserialize)]
struct FieldEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    min: Option<BoundEntry>,
    #[serde(default)]
    max: Option<BoundEntry>,
    #[serde(default)]
    choices: Vec<serde_json::Value>,
    #[serde(default)]
    enabled: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BoundEntry {
    Fixed(i64),
    Field {
        field: String,
        #[serde(default = "default_times")]
        times: i64,
        #[serde(default)]
        plus: i64,
    },
}

fn default_times() -> i64 {
    1
}

impl From<BoundEntry> for Bound {
    fn from(entry: BoundEntry) -> Self {
        match entry {
            BoundEntry::Fixed(n) => Bound::Fixed(n),
            BoundEntry::Field { field, times, plus } => Bound::scaled(field, times, plus),
        }
    }
}

/// Parses a schema document and validates every domain in it.
///
/// # Errors
///
/// `Knowledge(Configuration)` naming the field for an unknown type, a
/// missing bound, an unusable choice or enabled value, or any violation
/// reported by [`Schema::new`].
pub fn load_schemas(yaml: &str) -> Result<Vec<Schema>, CatalogError> {
    let document: SchemaDocument =
        serde_yaml::from_str(yaml).map_err(|e| CatalogError::resource(e.to_string()))?;

    let mut schemas = Vec::with_capacity(document.domains.len());
    for domain in document.domains {
        let fields = domain
            .fields
            .into_iter()
            .map(field_spec)
            .collect::<Result<Vec<_>, _>>()?;
        let schema = Schema::new(domain.name, fields)?.with_required_parameters(domain.required);
        tracing::debug!(domain = schema.domain(), fields = schema.fields().len(), "loaded schema");
        schemas.push(schema);
    }
    Ok(schemas)
}

fn field_spec(entry: FieldEntry) -> Result<FieldSpec, KnowledgeError> {
    let name = entry.name;
    let spec = match entry.kind.as_str() {
        "integer" => {
            let min = entry
                .min
                .ok_or_else(|| KnowledgeError::configuration(&name, "integer field needs 'min'"))?;
            let max = entry
                .max
                .ok_or_else(|| KnowledgeError::configuration(&name, "integer field needs 'max'"))?;
            FieldSpec::integer(name.clone(), Bound::from(min), Bound::from(max))
        }
        "categorical" => {
            let choices = entry
                .choices
                .iter()
                .map(|choice| {
                    Value::from_json(choice).ok_or_else(|| {
                        KnowledgeError::configuration(&name, format!("unsupported choice {}", choice))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            FieldSpec::categorical(name.clone(), choices)
        }
        "boolean" => FieldSpec::boolean(name.clone()),
        other => {
            return Err(KnowledgeError::configuration(
                &name,
                format!("unknown type '{}'", other),
            ))
        }
    };

    if entry.enabled.is_empty() {
        return Ok(spec);
    }
    let mut condition = Constraints::new();
    for (field, raw) in entry.enabled {
        let value = Value::from_json(&raw).ok_or_else(|| {
            KnowledgeError::configuration(&name, format!("unsupported enabled value {}", raw))
        })?;
        let constraint = constraint_from_value(value)
            .map_err(|e| KnowledgeError::configuration(&name, e.to_string()))?;
        condition.insert(field, constraint);
    }
    Ok(spec.enabled_when(condition))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge::FieldKind;

    #[test]
    fn standard_schemas_load() {
        let schemas = load_schemas(STANDARD_SCHEMAS).unwrap();
        let names: Vec<&str> = schemas.iter().map(Schema::domain).collect();
        for expected in ["restaurant", "hotel", "plane", "apartment", "spaceship"] {
            assert!(names.contains(&expected), "missing domain {}", expected);
        }
    }

    #[test]
    fn derived_bounds_and_enabled_conditions_are_read() {
        let schemas = load_schemas(STANDARD_SCHEMAS).unwrap();
        let apartment = schemas.iter().find(|s| s.domain() == "apartment").unwrap();

        let size = apartment.field("FloorSquareMeters").unwrap();
        match size.kind() {
            FieldKind::Integer { min, .. } => {
                assert_eq!(min, &Bound::scaled("NumRooms", 15, 10));
            }
            other => panic!("unexpected kind {:?}", other),
        }
        let side = apartment.field("BalconySide").unwrap();
        assert!(side.enabled().unwrap().contains_key("HasBalcony"));
    }

    #[test]
    fn expression_in_enabled_map_becomes_predicate() {
        let yaml = r#"
domains:
  - name: x
    fields:
      - name: Level
        type: integer
        min: 1
        max: 10
      - name: HasElevator
        type: boolean
        enabled: { Level: 'atLeast(4)' }
"#;
        let schemas = load_schemas(yaml).unwrap();
        let condition = schemas[0].field("HasElevator").unwrap().enabled().unwrap();
        assert_eq!(condition.to_expression(), "[{'Level': 'atLeast(4)'}]");
    }

    #[test]
    fn unknown_type_names_the_field() {
        let yaml = r#"
domains:
  - name: x
    fields:
      - name: Price
        type: float
"#;
        let err = load_schemas(yaml).unwrap_err();
        assert_eq!(
            err,
            CatalogError::Knowledge(KnowledgeError::configuration("Price", "unknown type 'float'"))
        );
    }

    #[test]
    fn forward_reference_is_rejected() {
        let yaml = r#"
domains:
  - name: x
    fields:
      - name: Size
        type: integer
        min: { field: Rooms }
        max: 100
      - name: Rooms
        type: integer
        min: 1
        max: 5
"#;
        assert!(matches!(
            load_schemas(yaml),
            Err(CatalogError::Knowledge(KnowledgeError::Configuration { ref field, .. })) if field == "Size"
        ));
    }

    #[test]
    fn required_parameters_are_carried() {
        let yaml = r#"
domains:
  - name: x
    required: [City]
    fields:
      - name: City
        type: categorical
        choices: [Paris]
"#;
        let schemas = load_schemas(yaml).unwrap();
        assert_eq!(schemas[0].required_parameters(), ["City".to_string()]);
    }
}
