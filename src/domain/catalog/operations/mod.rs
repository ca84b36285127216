//! Business rules for every simulated domain.
//!
//! Each submodule exposes `operations()`, the operations of a group of
//! related domains. Handlers translate the caller's parameters into a
//! derived constraint set, query the bound knowledge base and shape the
//! response.

mod dining;
mod housing;
mod services;
mod spaceship;
mod travel;

use super::errors::CatalogError;
use super::operation::{Operation, OperationContext};
use super::response::ApiResponse;

/// All built-in operations.
pub fn standard_operations() -> Vec<Operation> {
    let mut operations = Vec::new();
    operations.extend(dining::operations());
    operations.extend(travel::operations());
    operations.extend(services::operations());
    operations.extend(housing::operations());
    operations.extend(spaceship::operations());
    operations
}

/// Plain search over a domain: the caller's constraints are applied as-is
/// and one random match is returned.
pub fn search(ctx: &mut OperationContext<'_>) -> Result<ApiResponse, CatalogError> {
    let request = ctx.request();
    let (record, count) = ctx.sample(request)?;
    Ok(match record {
        Some(record) => ApiResponse::from_record(record, count),
        None => ApiResponse::empty(),
    })
}

/// A search operation named `<domain>_search`.
pub fn search_operation(domain: &str) -> Operation {
    Operation::new(format!("{}_search", domain), domain, search)
}
