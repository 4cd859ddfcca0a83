//! CognisGraph Graph
//!
//! This crate provides the in-memory knowledge graph and the algorithms the
//! explainability engine runs over it.
//!
//! # Modules
//!
//! - [`store`] - Graph snapshots and the shared knowledge store
//! - [`traversal`] - Shortest paths and simple path enumeration
//! - [`analytics`] - Centrality, community detection, and similarity

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod analytics;
pub mod store;
pub mod traversal;

pub use store::{Graph, GraphError, GraphResult, KnowledgeStore, NodeIndex};
pub use traversal::{Direction, PathResult};
