//! Knowledge base - a fixed table of generated records for one domain.
//!
//! Records are generated eagerly at construction and never change
//! afterwards, so a knowledge base can be shared read-only (behind an `Arc`)
//! by every session running against the same domain.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::foundation::RecordId;

use super::constraint::Constraints;
use super::errors::KnowledgeError;
use super::field_spec::Schema;
use super::generator;
use super::record::Record;

/// Immutable, ordered collection of records for one domain.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    domain: String,
    records: Vec<Record>,
    required: Vec<String>,
}

impl KnowledgeBase {
    /// Generates `size` records from the schema, ids `0..size`.
    ///
    /// # Errors
    ///
    /// `Configuration` if any record cannot be sampled.
    pub fn generate<R: Rng + ?Sized>(
        schema: &Schema,
        size: usize,
        rng: &mut R,
    ) -> Result<Self, KnowledgeError> {
        let records = (0..size)
            .map(|index| generator::generate(schema, RecordId::new(index as u32), rng))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(domain = schema.domain(), size, "generated knowledge base");
        Ok(Self {
            domain: schema.domain().to_string(),
            records,
            required: schema.required_parameters().to_vec(),
        })
    }

    /// Wraps pre-built records, e.g. fixtures.
    pub fn from_records(domain: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            domain: domain.into(),
            records,
            required: Vec::new(),
        }
    }

    pub fn with_required_parameters<S: Into<String>>(
        mut self,
        required: impl IntoIterator<Item = S>,
    ) -> Self {
        self.required = required.into_iter().map(Into::into).collect();
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn required_parameters(&self) -> &[String] {
        &self.required
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id.value() as usize).filter(|r| r.id() == id)
    }

    /// Every record matching all constraints, in table order.
    ///
    /// # Errors
    ///
    /// `MissingParameter` if a required parameter has no constraint.
    pub fn lookup(&self, constraints: &Constraints) -> Result<Vec<&Record>, KnowledgeError> {
        if let Some(missing) = constraints.first_missing(self.required.as_slice()) {
            return Err(KnowledgeError::missing_parameter(missing));
        }
        Ok(self
            .records
            .iter()
            .filter(|record| constraints.matches(record))
            .collect())
    }

    /// Like [`lookup`](Self::lookup) with optional constraints; `None` selects
    /// everything the required parameters allow.
    pub fn get_all(&self, constraints: Option<&Constraints>) -> Result<Vec<&Record>, KnowledgeError> {
        match constraints {
            Some(constraints) => self.lookup(constraints),
            None => self.lookup(&Constraints::new()),
        }
    }

    /// One uniformly chosen match plus the total match count; `(None, 0)`
    /// when nothing matches. Pass a seeded rng for reproducible picks.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        constraints: &Constraints,
        rng: &mut R,
    ) -> Result<(Option<&Record>, usize), KnowledgeError> {
        let matches = self.lookup(constraints)?;
        let count = matches.len();
        Ok((matches.choose(rng).copied(), count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge::field_spec::FieldSpec;
    use crate::domain::knowledge::predicate::at_least;
    use crate::domain::knowledge::value::Value;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn schema() -> Schema {
        Schema::new(
            "apartment",
            vec![
                FieldSpec::integer("Level", 1, 10),
                FieldSpec::boolean("HasBalcony"),
                FieldSpec::categorical("Name", ["Elm", "Oak", "Pine"]),
            ],
        )
        .unwrap()
    }

    fn kb(size: usize, seed: u64) -> KnowledgeBase {
        KnowledgeBase::generate(&schema(), size, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn generates_requested_size_with_sequential_ids() {
            let kb = kb(50, 1);
            assert_eq!(kb.len(), 50);
            for (index, record) in kb.records().iter().enumerate() {
                assert_eq!(record.id(), RecordId::new(index as u32));
            }
        }

        #[test]
        fn get_finds_record_by_id() {
            let kb = kb(5, 1);
            assert_eq!(kb.get(RecordId::new(3)).map(Record::id), Some(RecordId::new(3)));
            assert!(kb.get(RecordId::new(9)).is_none());
        }
    }

    mod lookup {
        use super::*;

        #[test]
        fn empty_constraints_return_everything() {
            let kb = kb(20, 2);
            assert_eq!(kb.lookup(&Constraints::new()).unwrap().len(), 20);
            assert_eq!(kb.get_all(None).unwrap().len(), 20);
        }

        #[test]
        fn matches_literal_and_predicate_entries() {
            let kb = kb(200, 3);
            let c = Constraints::new()
                .with("HasBalcony", true)
                .with("Level", at_least(5));
            let found = kb.lookup(&c).unwrap();
            assert!(found.iter().all(|r| {
                r.get("HasBalcony") == Some(&Value::Bool(true))
                    && r.get("Level").and_then(Value::as_int).unwrap() >= 5
            }));
            let expected = kb.records().iter().filter(|r| c.matches(r)).count();
            assert_eq!(found.len(), expected);
        }

        #[test]
        fn required_parameter_fails_fast() {
            let kb = kb(5, 4).with_required_parameters(["Name"]);
            assert_eq!(
                kb.lookup(&Constraints::new().with("Level", 1)).unwrap_err(),
                KnowledgeError::missing_parameter("Name")
            );
            assert!(kb.get_all(None).is_err());
            assert!(kb.lookup(&Constraints::new().with("Name", "Elm")).is_ok());
        }
    }

    mod sample {
        use super::*;

        #[test]
        fn no_match_returns_none_and_zero() {
            let kb = kb(30, 5);
            let c = Constraints::new().with("Name", "Birch");
            let (record, count) = kb.sample(&c, &mut StdRng::seed_from_u64(0)).unwrap();
            assert!(record.is_none());
            assert_eq!(count, 0);
        }

        #[test]
        fn seeded_rng_makes_sample_reproducible() {
            let kb = kb(100, 6);
            let c = Constraints::new();
            let (a, _) = kb.sample(&c, &mut StdRng::seed_from_u64(9)).unwrap();
            let (b, _) = kb.sample(&c, &mut StdRng::seed_from_u64(9)).unwrap();
            assert_eq!(a.map(Record::id), b.map(Record::id));
        }
    }

    proptest! {
        #[test]
        fn adding_a_constraint_never_grows_the_match_set(seed in any::<u64>(), level in 1i64..=10) {
            let kb = kb(150, seed);
            let base = Constraints::new().with("HasBalcony", true);
            let narrowed = base.clone().with("Level", at_least(level));
            prop_assert!(kb.lookup(&narrowed).unwrap().len() <= kb.lookup(&base).unwrap().len());
        }

        #[test]
        fn sample_agrees_with_lookup(seed in any::<u64>(), name in prop::sample::select(vec!["Elm", "Oak", "Birch"])) {
            let kb = kb(60, seed);
            let c = Constraints::new().with("Name", name);
            let matches = kb.lookup(&c).unwrap();
            let (picked, count) = kb.sample(&c, &mut StdRng::seed_from_u64(seed)).unwrap();
            prop_assert_eq!(count, matches.len());
            prop_assert_eq!(picked.is_none(), matches.is_empty());
            if let Some(record) = picked {
                prop_assert!(matches.contains(&record));
            }
        }
    }
}
