//! Catalog operations and the context handed to their business rules.

use std::fmt;
use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::domain::knowledge::{Constraint, Constraints, KnowledgeBase, Record, Value};

use super::errors::CatalogError;
use super::response::ApiResponse;

/// Business rule behind an operation.
pub type Handler = fn(&mut OperationContext<'_>) -> Result<ApiResponse, CatalogError>;

/// A named business operation bound to one domain's knowledge base.
#[derive(Clone)]
pub struct Operation {
    name: String,
    domain: String,
    required: Vec<String>,
    failure: (String, String),
    handler: Handler,
}

impl Operation {
    /// Creates an operation with no required parameters that fails with
    /// `{"Message": "<name> failed"}`.
    pub fn new(name: impl Into<String>, domain: impl Into<String>, handler: Handler) -> Self {
        let name = name.into();
        let failure = ("Message".to_string(), format!("{} failed", name));
        Self {
            name,
            domain: domain.into(),
            required: Vec::new(),
            failure,
            handler,
        }
    }

    pub fn requires(mut self, parameters: &[&str]) -> Self {
        self.required = parameters.iter().map(|p| p.to_string()).collect();
        self
    }

    /// The status-only map returned when a call is recovered.
    pub fn fails_with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.failure = (key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn required_parameters(&self) -> &[String] {
        &self.required
    }

    pub fn failure_response(&self) -> ApiResponse {
        ApiResponse::status_only(&self.failure.0, &self.failure.1)
    }

    /// Checks required parameters, then runs the business rule.
    pub fn run(
        &self,
        request: &Constraints,
        knowledge_base: &KnowledgeBase,
        rng: &mut dyn RngCore,
    ) -> Result<ApiResponse, CatalogError> {
        if let Some(missing) = request.first_missing(self.required.as_slice()) {
            return Err(CatalogError::missing(&self.name, missing));
        }
        let mut context = OperationContext {
            operation: &self.name,
            request,
            knowledge_base,
            rng,
        };
        (self.handler)(&mut context)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("domain", &self.domain)
            .field("required", &self.required)
            .finish()
    }
}

/// Everything a business rule may read: the caller's constraints, the
/// bound knowledge base and the session's random source.
pub struct OperationContext<'a> {
    operation: &'a str,
    request: &'a Constraints,
    knowledge_base: &'a KnowledgeBase,
    rng: &'a mut dyn RngCore,
}

impl<'a> OperationContext<'a> {
    pub fn operation(&self) -> &str {
        self.operation
    }

    pub fn request(&self) -> &'a Constraints {
        self.request
    }

    pub fn knowledge_base(&self) -> &'a KnowledgeBase {
        self.knowledge_base
    }

    /// The literal value of a parameter.
    pub fn literal(&self, name: &str) -> Result<&'a Value, CatalogError> {
        match self.request.get(name) {
            Some(Constraint::Literal(value)) => Ok(value),
            Some(Constraint::Predicate(_)) => Err(CatalogError::invalid(
                self.operation,
                name,
                "expected a literal value",
            )),
            None => Err(CatalogError::missing(self.operation, name)),
        }
    }

    pub fn int(&self, name: &str) -> Result<i64, CatalogError> {
        self.literal(name)?
            .as_int()
            .ok_or_else(|| CatalogError::invalid(self.operation, name, "expected an integer"))
    }

    pub fn text(&self, name: &str) -> Result<&'a str, CatalogError> {
        self.literal(name)?
            .as_text()
            .ok_or_else(|| CatalogError::invalid(self.operation, name, "expected text"))
    }

    /// Copies the named parameters, when present, into `constraints`.
    pub fn pass_through(&self, constraints: &mut Constraints, names: &[&str]) {
        for name in names {
            if let Some(constraint) = self.request.get(name) {
                constraints.insert(*name, constraint.clone());
            }
        }
    }

    pub fn sample(
        &mut self,
        constraints: &Constraints,
    ) -> Result<(Option<&'a Record>, usize), CatalogError> {
        let knowledge_base = self.knowledge_base;
        Ok(knowledge_base.sample(constraints, &mut *self.rng)?)
    }

    pub fn all(&self, constraints: &Constraints) -> Result<Vec<&'a Record>, CatalogError> {
        let knowledge_base = self.knowledge_base;
        Ok(knowledge_base.get_all(Some(constraints))?)
    }

    /// Picks one of several outcome strings uniformly.
    pub fn choose(&mut self, outcomes: &[&'static str]) -> &'static str {
        outcomes.choose(&mut *self.rng).copied().unwrap_or_default()
    }

    pub fn gen_range(&mut self, range: RangeInclusive<i64>) -> i64 {
        self.rng.gen_range(range)
    }
}

/// The match with the smallest integer value of `field`; records missing
/// the field sort last.
pub fn min_by_field<'r>(records: &[&'r Record], field: &str) -> Option<&'r Record> {
    records
        .iter()
        .copied()
        .min_by_key(|record| record.get(field).and_then(Value::as_int).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::RecordId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn echo(ctx: &mut OperationContext<'_>) -> Result<ApiResponse, CatalogError> {
        let size = ctx.int("Size")?;
        Ok(ApiResponse::empty().with("Size", size))
    }

    fn kb() -> KnowledgeBase {
        KnowledgeBase::from_records(
            "restaurant",
            vec![
                Record::new(RecordId::new(0)).with_field("Hour", 9),
                Record::new(RecordId::new(1)).with_field("Hour", 7),
                Record::new(RecordId::new(2)),
            ],
        )
    }

    #[test]
    fn required_parameters_checked_before_handler() {
        let op = Operation::new("echo", "restaurant", echo).requires(&["Name", "Size"]);
        let request = Constraints::new().with("Size", 2);
        let err = op
            .run(&request, &kb(), &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert_eq!(err, CatalogError::missing("echo", "Name"));
    }

    #[test]
    fn predicate_where_literal_expected_is_invalid() {
        use crate::domain::knowledge::predicate::at_least;
        let op = Operation::new("echo", "restaurant", echo);
        let request = Constraints::new().with("Size", at_least(2));
        let err = op
            .run(&request, &kb(), &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidParameter { ref parameter, .. } if parameter == "Size"));
    }

    #[test]
    fn default_failure_is_status_only() {
        let op = Operation::new("echo", "restaurant", echo).fails_with("Status", "failed");
        assert_eq!(op.failure_response(), ApiResponse::status_only("Status", "failed"));
    }

    #[test]
    fn min_by_field_prefers_present_values() {
        let kb = kb();
        let records: Vec<&Record> = kb.records().iter().collect();
        assert_eq!(min_by_field(&records, "Hour").map(Record::id), Some(RecordId::new(1)));
    }
}
