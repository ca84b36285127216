//! Domain layer containing the simulation logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, errors, state machine)
//! - `knowledge` - Values, predicates, field schemas, record generation and knowledge bases
//! - `catalog` - Domain catalog: operations bound to knowledge bases
//! - `protocol` - Commands, their wire and event forms, and the codec
//! - `dialogue` - Session stages, the knowledge-base oracle and the dialogue world

pub mod catalog;
pub mod dialogue;
pub mod foundation;
pub mod knowledge;
pub mod protocol;
