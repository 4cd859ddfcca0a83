//! Error types for graph store and analytics operations.

use cognisgraph_core::{CoreError, EntityId};
use thiserror::Error;

/// Errors that can occur in graph operations.
#[derive(Debug, Error)]
pub enum GraphError {
    /// An entity (node) was not found.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// Referenced entity does not exist when creating a relationship.
    #[error("referenced entity does not exist: {0}")]
    InvalidEntityReference(EntityId),

    /// An entity with the given ID already exists.
    #[error("entity already exists: {0}")]
    EntityAlreadyExists(EntityId),

    /// A relationship with the same source, target, and type already exists.
    #[error("relationship already exists: {from} -[{rel_type}]-> {to}")]
    RelationshipAlreadyExists {
        /// The source entity.
        from: EntityId,
        /// The target entity.
        to: EntityId,
        /// The relationship type.
        rel_type: String,
    },

    /// Graph exceeds the configured size limit for an algorithm.
    #[error("graph too large: {node_count} nodes exceeds limit of {limit}")]
    GraphTooLarge {
        /// The number of nodes in the graph.
        node_count: usize,
        /// The configured limit.
        limit: usize,
    },

    /// A record failed validation.
    #[error("validation error: {0}")]
    Validation(String),
}

impl From<CoreError> for GraphError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::Validation(msg),
        }
    }
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
