//! InvokeOperationHandler - Query handler that runs one catalog operation
//! from textual constraints.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::domain::catalog::{ApiResponse, CatalogError, DomainCatalog};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::knowledge::expression;
use crate::domain::knowledge::{Constraints, ExpressionError};

/// Query to run an operation.
#[derive(Debug, Clone)]
pub struct InvokeOperationCommand {
    /// Operation or bare domain name.
    pub api_name: String,
    /// Constraint list in query syntax, e.g. `[{'Level': 'atLeast(3)'}]`.
    /// Empty text means no constraints.
    pub constraints: String,
    /// Surface missing or invalid parameters instead of recovering them.
    pub strict: bool,
    pub seed: Option<u64>,
}

/// Errors from invoking an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeOperationError {
    #[error("malformed constraints: {0}")]
    Constraints(#[from] ExpressionError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl From<InvokeOperationError> for DomainError {
    fn from(err: InvokeOperationError) -> Self {
        match err {
            InvokeOperationError::Constraints(inner) => {
                DomainError::new(ErrorCode::MalformedExpression, inner.to_string())
            }
            InvokeOperationError::Catalog(inner) => inner.into(),
        }
    }
}

/// Handler for operation calls.
pub struct InvokeOperationHandler {
    catalog: Arc<DomainCatalog>,
}

impl InvokeOperationHandler {
    pub fn new(catalog: Arc<DomainCatalog>) -> Self {
        Self { catalog }
    }

    pub fn handle(&self, cmd: InvokeOperationCommand) -> Result<ApiResponse, InvokeOperationError> {
        // 1. Parse the constraint list
        let constraints = if cmd.constraints.trim().is_empty() {
            Constraints::new()
        } else {
            expression::parse_constraint_list(expression::parse(&cmd.constraints)?)?
        };

        // 2. Dispatch
        let mut rng = match cmd.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let response = if cmd.strict {
            self.catalog.invoke(&cmd.api_name, &constraints, &mut rng)?
        } else {
            self.catalog.call(&cmd.api_name, &constraints, &mut rng)?
        };
        Ok(response)
    }
}
