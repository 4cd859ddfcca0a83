//! Error types for the explainability engine.

use cognisgraph_core::EntityId;
use cognisgraph_graph::GraphError;
use thiserror::Error;

/// Errors raised inside an analyzer.
///
/// These never cross the degrading entry points (`analyze`,
/// `explain_entity`, ...); they surface as `error` fields there. The
/// fallible `try_*` variants return them directly.
#[derive(Debug, Error)]
pub enum XaiError {
    /// A graph algorithm or lookup failed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The entity is not in the current snapshot.
    #[error("Entity ID '{0}' not found.")]
    EntityNotFound(EntityId),

    /// The query result carried nothing to explain.
    #[error("Empty query result")]
    EmptyQueryResult,

    /// The query result reported its own failure.
    #[error("{0}")]
    QueryFailed(String),

    /// A measure could not produce a value after every fallback.
    #[error("{measure} failed: {reason}")]
    MeasureFailed {
        /// Name of the measure.
        measure: &'static str,
        /// Why the last attempt failed.
        reason: String,
    },
}

/// Result type for explainability operations.
pub type XaiResult<T> = Result<T, XaiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_matches_caller_contract() {
        let err = XaiError::EntityNotFound(EntityId::new("missing"));
        assert_eq!(err.to_string(), "Entity ID 'missing' not found.");
    }

    #[test]
    fn graph_errors_pass_through() {
        let err: XaiError = GraphError::GraphTooLarge { node_count: 3, limit: 1 }.into();
        assert_eq!(err.to_string(), "graph too large: 3 nodes exceeds limit of 1");
    }
}
