//! Integration tests for the domain catalog.
//!
//! Builds the standard catalog from the embedded schemas and exercises it
//! through the operation handler, the way the command line does.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

use wozsim::application::{InvokeOperationCommand, InvokeOperationError, InvokeOperationHandler};
use wozsim::domain::catalog::{CatalogError, DomainCatalog};
use wozsim::domain::knowledge::Constraints;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn catalog() -> Arc<DomainCatalog> {
    Arc::new(DomainCatalog::standard(1000, &mut StdRng::seed_from_u64(2024)).unwrap())
}

fn command(api: &str, constraints: &str) -> InvokeOperationCommand {
    InvokeOperationCommand {
        api_name: api.to_string(),
        constraints: constraints.to_string(),
        strict: false,
        seed: Some(11),
    }
}

// =============================================================================
// Searches
// =============================================================================

#[test]
fn unconstrained_search_counts_every_record() {
    let handler = InvokeOperationHandler::new(catalog());

    let response = handler.handle(command("apartment_search", "")).unwrap();

    assert_eq!(response.count, 1000);
    assert!(response.get("Name").is_some());
}

#[test]
fn bare_domain_resolves_to_its_search() {
    let handler = InvokeOperationHandler::new(catalog());

    let by_domain = handler.handle(command("apartment", "")).unwrap();

    assert_eq!(by_domain.count, 1000);
}

#[test]
fn balcony_search_counts_matching_records() {
    let catalog = catalog();
    let expected = catalog
        .knowledge_base("apartment")
        .unwrap()
        .lookup(&Constraints::new().with("HasBalcony", true))
        .unwrap()
        .len();
    let handler = InvokeOperationHandler::new(Arc::clone(&catalog));

    let response = handler
        .handle(command("apartment_search", "[{'HasBalcony': True}]"))
        .unwrap();

    assert_eq!(response.count, expected);
    assert!(expected > 0 && expected < 1000);
    assert_eq!(response.get("HasBalcony"), Some(&json!(true)));
}

#[test]
fn predicate_constraints_are_applied() {
    let handler = InvokeOperationHandler::new(catalog());

    let response = handler
        .handle(command("apartment_search", "[{'Level': 'atLeast(100)'}]"))
        .unwrap();

    assert!(response.is_empty());
    assert_eq!(response.count, 0);
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn reservation_without_name_returns_failure_map() {
    let handler = InvokeOperationHandler::new(catalog());

    let response = handler
        .handle(command("restaurant_reserve", "[{'Time': 19}, {'Size': 2}]"))
        .unwrap();

    assert_eq!(response.get("ReservationStatus"), Some(&json!("failed")));
    assert_eq!(response.item.len(), 1);
    assert_eq!(response.missing_parameter.as_deref(), Some("Name"));
}

#[test]
fn strict_reservation_without_name_is_an_error() {
    let handler = InvokeOperationHandler::new(catalog());
    let mut cmd = command("restaurant_reserve", "[{'Time': 19}, {'Size': 2}]");
    cmd.strict = true;

    let err = handler.handle(cmd).unwrap_err();

    assert_eq!(
        err,
        InvokeOperationError::Catalog(CatalogError::missing("restaurant_reserve", "Name"))
    );
}

#[test]
fn unknown_operation_is_an_error() {
    let handler = InvokeOperationHandler::new(catalog());

    let err = handler.handle(command("submarine_search", "")).unwrap_err();

    assert!(matches!(
        err,
        InvokeOperationError::Catalog(CatalogError::UnknownOperation(_))
    ));
}

#[test]
fn malformed_constraints_are_rejected() {
    let handler = InvokeOperationHandler::new(catalog());

    let err = handler
        .handle(command("apartment_search", "[{'Level': open('x')}]"))
        .unwrap_err();

    assert!(matches!(err, InvokeOperationError::Constraints(_)));
}
