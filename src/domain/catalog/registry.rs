//! Domain catalog - maps operation names to business rules and the
//! knowledge base each one runs against.
//!
//! The catalog is built once at start-up and shared read-only; every call
//! takes the caller's random source so sessions stay independent and tests
//! can seed them.

use std::collections::HashMap;
use std::sync::Arc;

use rand::{Rng, RngCore};

use crate::domain::knowledge::{Constraints, KnowledgeBase, Schema};

use super::errors::CatalogError;
use super::operation::Operation;
use super::operations::{search_operation, standard_operations};
use super::response::ApiResponse;
use super::schema::{load_schemas, STANDARD_SCHEMAS};

/// Registry of knowledge bases and the operations bound to them.
#[derive(Debug, Clone, Default)]
pub struct DomainCatalog {
    knowledge_bases: HashMap<String, Arc<KnowledgeBase>>,
    operations: HashMap<String, Operation>,
}

impl DomainCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in schemas and operations.
    ///
    /// # Errors
    ///
    /// Configuration errors from the embedded schemas.
    pub fn standard<R: Rng + ?Sized>(
        records_per_domain: usize,
        rng: &mut R,
    ) -> Result<Self, CatalogError> {
        let schemas = load_schemas(STANDARD_SCHEMAS)?;
        Self::from_schemas(&schemas, records_per_domain, rng)
    }

    /// Generates one knowledge base per schema and registers every built-in
    /// operation whose domain is present. Domains without a dedicated search
    /// operation get a plain `<domain>_search`.
    pub fn from_schemas<R: Rng + ?Sized>(
        schemas: &[Schema],
        records_per_domain: usize,
        rng: &mut R,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for schema in schemas {
            let knowledge_base = KnowledgeBase::generate(schema, records_per_domain, rng)?;
            catalog.register_knowledge_base(knowledge_base);
        }
        for operation in standard_operations() {
            if catalog.knowledge_bases.contains_key(operation.domain()) {
                catalog.register_operation(operation)?;
            }
        }
        let domains: Vec<String> = catalog.knowledge_bases.keys().cloned().collect();
        for domain in domains {
            if !catalog.operations.contains_key(&format!("{}_search", domain)) {
                catalog.register_operation(search_operation(&domain))?;
            }
        }
        tracing::info!(
            domains = catalog.knowledge_bases.len(),
            operations = catalog.operations.len(),
            records_per_domain,
            "domain catalog loaded"
        );
        Ok(catalog)
    }

    /// Registers (or replaces) a domain's knowledge base.
    pub fn register_knowledge_base(&mut self, knowledge_base: KnowledgeBase) {
        self.knowledge_bases
            .insert(knowledge_base.domain().to_string(), Arc::new(knowledge_base));
    }

    /// Registers an operation.
    ///
    /// # Errors
    ///
    /// A configuration error when the operation's domain has no knowledge base.
    pub fn register_operation(&mut self, operation: Operation) -> Result<(), CatalogError> {
        if !self.knowledge_bases.contains_key(operation.domain()) {
            return Err(CatalogError::resource(format!(
                "operation '{}' is bound to unknown domain '{}'",
                operation.name(),
                operation.domain()
            )));
        }
        self.operations.insert(operation.name().to_string(), operation);
        Ok(())
    }

    pub fn knowledge_base(&self, domain: &str) -> Option<&Arc<KnowledgeBase>> {
        self.knowledge_bases.get(domain)
    }

    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.get(name)
    }

    /// Resolves an operation name, or a bare domain name to that domain's
    /// search operation.
    pub fn resolve(&self, name: &str) -> Option<&Operation> {
        self.operations
            .get(name)
            .or_else(|| self.operations.get(&format!("{}_search", name)))
    }

    /// Registered operation names, sorted.
    pub fn operation_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.operations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Domains with a knowledge base, sorted.
    pub fn domains(&self) -> Vec<&str> {
        let mut domains: Vec<&str> = self.knowledge_bases.keys().map(String::as_str).collect();
        domains.sort_unstable();
        domains
    }

    /// Runs an operation and surfaces every error to the caller.
    pub fn invoke(
        &self,
        api_name: &str,
        constraints: &Constraints,
        rng: &mut dyn RngCore,
    ) -> Result<ApiResponse, CatalogError> {
        let operation = self
            .resolve(api_name)
            .ok_or_else(|| CatalogError::UnknownOperation(api_name.to_string()))?;
        let knowledge_base = self
            .knowledge_bases
            .get(operation.domain())
            .ok_or_else(|| CatalogError::UnknownOperation(api_name.to_string()))?;
        tracing::debug!(
            operation = operation.name(),
            constraints = %constraints.to_expression(),
            "invoking operation"
        );
        operation.run(constraints, knowledge_base, rng)
    }

    /// Runs an operation, recovering missing or unusable parameters into
    /// the operation's status-only failure response.
    ///
    /// # Errors
    ///
    /// `UnknownOperation`, and knowledge-base configuration errors.
    pub fn call(
        &self,
        api_name: &str,
        constraints: &Constraints,
        rng: &mut dyn RngCore,
    ) -> Result<ApiResponse, CatalogError> {
        match self.invoke(api_name, constraints, rng) {
            Ok(response) => Ok(response),
            Err(err) => {
                let recovered = err
                    .recoverable_parameter()
                    .map(str::to_string)
                    .zip(self.resolve(api_name));
                match recovered {
                    Some((parameter, operation)) => {
                        tracing::warn!(
                            operation = operation.name(),
                            parameter = parameter.as_str(),
                            error = %err,
                            "operation failed on parameter"
                        );
                        Ok(operation.failure_response().with_missing_parameter(parameter))
                    }
                    None => Err(err),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge::predicate::at_least;
    use crate::domain::knowledge::Value;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn catalog(size: usize) -> DomainCatalog {
        DomainCatalog::standard(size, &mut StdRng::seed_from_u64(42)).unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn every_standard_operation_is_registered() {
            let catalog = catalog(10);
            for name in [
                "restaurant_search",
                "restaurant_reserve",
                "hotel_reserve",
                "hotel_service_request",
                "plane_search",
                "ride_book",
                "ride_status",
                "trip_directions",
                "weather",
                "bank_balance",
                "shopping_order",
                "apartment_schedule",
                "party_plan",
                "meeting_schedule",
                "spaceship_life_support",
            ] {
                assert!(catalog.operation(name).is_some(), "missing {}", name);
            }
        }

        #[test]
        fn every_domain_answers_its_bare_name() {
            let catalog = catalog(10);
            for domain in catalog.domains() {
                assert!(catalog.resolve(domain).is_some(), "no search for {}", domain);
            }
        }

        #[test]
        fn operation_for_unknown_domain_is_rejected() {
            let mut catalog = DomainCatalog::new();
            let op = search_operation("nowhere");
            assert!(catalog.register_operation(op).is_err());
        }
    }

    mod dispatch {
        use super::*;

        #[test]
        fn unknown_operation_fails() {
            let catalog = catalog(5);
            let err = catalog
                .call("teleport", &Constraints::new(), &mut StdRng::seed_from_u64(0))
                .unwrap_err();
            assert_eq!(err, CatalogError::UnknownOperation("teleport".into()));
        }

        #[test]
        fn invoke_surfaces_missing_parameter() {
            let catalog = catalog(5);
            let request = Constraints::new().with("Time", 19).with("Size", 2);
            let err = catalog
                .invoke("restaurant_reserve", &request, &mut StdRng::seed_from_u64(0))
                .unwrap_err();
            assert_eq!(err, CatalogError::missing("restaurant_reserve", "Name"));
        }

        #[test]
        fn call_recovers_missing_name_into_status_only_failure() {
            let catalog = catalog(5);
            let request = Constraints::new().with("Time", 19).with("Size", 2);
            let response = catalog
                .call("restaurant_reserve", &request, &mut StdRng::seed_from_u64(0))
                .unwrap();
            assert_eq!(response.item.len(), 1);
            assert_eq!(response.get("ReservationStatus"), Some(&json!("failed")));
            assert_eq!(response.missing_parameter.as_deref(), Some("Name"));
            assert_eq!(response.count, 0);
        }

        #[test]
        fn call_recovers_wrong_parameter_type() {
            let catalog = catalog(5);
            let request = Constraints::new()
                .with("Name", "Roma")
                .with("Time", "seven")
                .with("Size", 2);
            let response = catalog
                .call("restaurant_reserve", &request, &mut StdRng::seed_from_u64(0))
                .unwrap();
            assert_eq!(response.missing_parameter.as_deref(), Some("Time"));
        }

        #[test]
        fn bare_domain_name_searches_that_domain() {
            let catalog = catalog(200);
            let request = Constraints::new().with("Level", at_least(3));
            let response = catalog
                .call("apartment", &request, &mut StdRng::seed_from_u64(1))
                .unwrap();
            let kb = catalog.knowledge_base("apartment").unwrap();
            assert_eq!(response.count, kb.lookup(&request).unwrap().len());
            let level = response.get("Level").and_then(|v| v.as_i64()).unwrap();
            assert!(level >= 3);
        }
    }

    mod apartment_scenario {
        use super::*;

        #[test]
        fn unconstrained_sample_counts_every_record() {
            let catalog = catalog(1000);
            let kb = catalog.knowledge_base("apartment").unwrap();
            let (record, count) = kb
                .sample(&Constraints::new(), &mut StdRng::seed_from_u64(2))
                .unwrap();
            assert!(record.is_some());
            assert_eq!(count, 1000);
        }

        #[test]
        fn balcony_sample_counts_balcony_records() {
            let catalog = catalog(1000);
            let kb = catalog.knowledge_base("apartment").unwrap();
            let expected = kb
                .records()
                .iter()
                .filter(|r| r.get("HasBalcony") == Some(&Value::Bool(true)))
                .count();
            let (_, count) = kb
                .sample(
                    &Constraints::new().with("HasBalcony", true),
                    &mut StdRng::seed_from_u64(3),
                )
                .unwrap();
            assert_eq!(count, expected);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn reservation_without_name_never_errors(time in 0i64..24, size in 1i64..12, seed in any::<u64>()) {
            let catalog = catalog(50);
            let request = Constraints::new().with("Time", time).with("Size", size);
            let response = catalog
                .call("restaurant_reserve", &request, &mut StdRng::seed_from_u64(seed))
                .unwrap();
            prop_assert_eq!(response.get("ReservationStatus"), Some(&json!("failed")));
        }
    }
}
