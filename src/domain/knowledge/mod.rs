//! Synthetic knowledge bases.
//!
//! - `value` / `predicate` / `constraint` - literal values and per-field match conditions
//! - `expression` - whitelisted parser for constraint expressions
//! - `field_spec` / `generator` - declarative schemas and record sampling
//! - `knowledge_base` - immutable record tables with lookup and sampling

mod constraint;
mod errors;
pub mod expression;
mod field_spec;
mod generator;
mod knowledge_base;
pub mod predicate;
mod record;
mod value;

pub use constraint::{Constraint, Constraints};
pub use errors::KnowledgeError;
pub use expression::ExpressionError;
pub use field_spec::{Bound, FieldKind, FieldSpec, Schema};
pub use generator::generate;
pub use knowledge_base::KnowledgeBase;
pub use predicate::Predicate;
pub use record::Record;
pub use value::Value;

pub(crate) use value::quote;
