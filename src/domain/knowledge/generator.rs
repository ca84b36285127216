//! Record generator.
//!
//! Samples one record from a [`Schema`] by walking its fields in declaration
//! order. A field whose enabled condition fails against the partially built
//! record is left out entirely; absence, not a sentinel value, is what
//! "not applicable" looks like downstream.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::foundation::RecordId;

use super::errors::KnowledgeError;
use super::field_spec::{FieldKind, Schema};
use super::record::Record;
use super::value::Value;

/// Generates one record with the externally supplied identifier.
///
/// # Errors
///
/// `Configuration` naming the field when an integer range resolves empty or
/// a bound reads a field that was not sampled for this record.
pub fn generate<R: Rng + ?Sized>(
    schema: &Schema,
    id: RecordId,
    rng: &mut R,
) -> Result<Record, KnowledgeError> {
    let mut record = Record::new(id);
    for spec in schema.fields() {
        if let Some(condition) = spec.enabled() {
            if !condition.matches(&record) {
                continue;
            }
        }
        let value = match spec.kind() {
            FieldKind::Integer { min, max } => {
                let lo = min.resolve(&record, spec.name())?;
                let hi = max.resolve(&record, spec.name())?;
                if lo > hi {
                    return Err(KnowledgeError::configuration(
                        spec.name(),
                        format!("resolved range [{}, {}] is empty", lo, hi),
                    ));
                }
                Value::Int(rng.gen_range(lo..=hi))
            }
            FieldKind::Categorical { choices } => choices
                .choose(rng)
                .cloned()
                .ok_or_else(|| KnowledgeError::configuration(spec.name(), "no choices"))?,
            FieldKind::Boolean => Value::Bool(rng.gen_bool(0.5)),
        };
        record.insert(spec.name(), value);
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge::constraint::Constraints;
    use crate::domain::knowledge::field_spec::{Bound, FieldSpec};
    use crate::domain::knowledge::predicate::at_least;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn apartment_schema() -> Schema {
        Schema::new(
            "apartment",
            vec![
                FieldSpec::integer("Level", 1, 15),
                FieldSpec::integer("MaxLevel", Bound::field("Level"), 20),
                FieldSpec::boolean("HasBalcony"),
                FieldSpec::categorical("BalconySide", ["north", "south", "east", "west"])
                    .enabled_when(Constraints::new().with("HasBalcony", true)),
                FieldSpec::boolean("HasElevator")
                    .enabled_when(Constraints::new().with("Level", at_least(4))),
                FieldSpec::categorical(
                    "Amenities",
                    vec![
                        Value::from(vec!["gym", "pool"]),
                        Value::from(vec!["laundry"]),
                    ],
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn id_is_supplied_not_sampled() {
        let mut rng = StdRng::seed_from_u64(7);
        let record = generate(&apartment_schema(), RecordId::new(41), &mut rng).unwrap();
        assert_eq!(record.id(), RecordId::new(41));
        assert!(record.get("id").is_none());
    }

    #[test]
    fn same_seed_generates_same_record() {
        let schema = apartment_schema();
        let a = generate(&schema, RecordId::new(0), &mut StdRng::seed_from_u64(3)).unwrap();
        let b = generate(&schema, RecordId::new(0), &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a.to_json(), b.to_json());
    }

    #[test]
    fn tuple_choices_are_sampled_whole() {
        let mut rng = StdRng::seed_from_u64(11);
        let record = generate(&apartment_schema(), RecordId::new(0), &mut rng).unwrap();
        assert!(record.get("Amenities").and_then(Value::as_list).is_some());
    }

    #[test]
    fn empty_resolved_range_names_field() {
        let schema = Schema::new(
            "x",
            vec![
                FieldSpec::integer("A", 10, 10),
                FieldSpec::integer("B", 0, Bound::scaled("A", 1, -20)),
            ],
        )
        .unwrap();
        let err = generate(&schema, RecordId::new(0), &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, KnowledgeError::Configuration { ref field, .. } if field == "B"));
    }

    #[test]
    fn bound_on_disabled_field_is_configuration_error() {
        let schema = Schema::new(
            "x",
            vec![
                FieldSpec::categorical("Flag", [false]),
                FieldSpec::integer("Rooms", 1, 4)
                    .enabled_when(Constraints::new().with("Flag", true)),
                FieldSpec::integer("Size", Bound::scaled("Rooms", 20, 0), 500),
            ],
        )
        .unwrap();
        let err = generate(&schema, RecordId::new(0), &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, KnowledgeError::Configuration { ref field, .. } if field == "Size"));
    }

    proptest! {
        #[test]
        fn disabled_fields_are_absent_and_integers_in_range(seed in any::<u64>()) {
            let schema = apartment_schema();
            let mut rng = StdRng::seed_from_u64(seed);
            let record = generate(&schema, RecordId::new(0), &mut rng).unwrap();

            let level = record.get("Level").and_then(Value::as_int).unwrap();
            prop_assert!((1..=15).contains(&level));
            let max_level = record.get("MaxLevel").and_then(Value::as_int).unwrap();
            prop_assert!((level..=20).contains(&max_level));

            let balcony = record.get("HasBalcony").and_then(Value::as_bool).unwrap();
            prop_assert_eq!(record.has("BalconySide"), balcony);
            prop_assert_eq!(record.has("HasElevator"), level >= 4);
        }
    }
}
