//! Catalog handlers.

mod invoke_operation;

pub use invoke_operation::{InvokeOperationCommand, InvokeOperationError, InvokeOperationHandler};
