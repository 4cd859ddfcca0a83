//! Core data types for CognisGraph.
//!
//! This module defines the types that represent entities, relationships,
//! and their properties in the knowledge graph.

mod entity;
mod id;
mod relationship;
mod value;

pub use entity::{Entity, Properties};
pub use id::EntityId;
pub use relationship::{Relationship, RelationshipKey};
pub use value::Value;
