//! CognisGraph Core
//!
//! This crate provides the data model shared by the graph store and the
//! explainability engine.
//!
//! # Modules
//!
//! - [`types`] - Core data types (Entity, Relationship, Value, IDs)
//! - [`error`] - Error types

#![deny(clippy::unwrap_used)]

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, CoreResult};
pub use types::{Entity, EntityId, Properties, Relationship, RelationshipKey, Value};
