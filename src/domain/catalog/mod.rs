//! Domain catalog module.
//!
//! Binds every simulated domain's schema and knowledge base to the
//! business operations (search, reserve, status, ...) that answer queries
//! against it.

mod errors;
mod operation;
pub mod operations;
mod registry;
mod response;
mod schema;

pub use errors::CatalogError;
pub use operation::{min_by_field, Handler, Operation, OperationContext};
pub use registry::DomainCatalog;
pub use response::ApiResponse;
pub use schema::{load_schemas, STANDARD_SCHEMAS};
