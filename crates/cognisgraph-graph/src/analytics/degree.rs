//! Degree Centrality implementation.
//!
//! Degree centrality counts the distinct nodes one hop away. Parallel
//! relationships of different types and self-loops do not add to the count,
//! so the normalized value is the fraction of the other nodes reachable in
//! one hop.
//!
//! # Formula
//!
//! DC(v) = |N(v) \ {v}| / (n - 1)
//!
//! where N(v) is the neighbor set in the configured direction. Graphs with a
//! single node score 0.

use super::{check_graph_size, ScoreMap};
use super::pagerank::DEFAULT_MAX_GRAPH_NODES;
use crate::store::{Graph, GraphResult};
use crate::traversal::Direction;

/// Configuration for Degree Centrality computation.
#[derive(Debug, Clone)]
pub struct DegreeCentralityConfig {
    /// Direction of neighbors to count.
    /// Default: Both
    pub direction: Direction,

    /// Whether to divide by (n-1).
    /// Default: true
    pub normalize: bool,

    /// Maximum number of nodes allowed before returning an error.
    /// Default: 10,000,000
    pub max_graph_nodes: Option<usize>,
}

impl Default for DegreeCentralityConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Both,
            normalize: true,
            max_graph_nodes: Some(DEFAULT_MAX_GRAPH_NODES),
        }
    }
}

impl DegreeCentralityConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the direction for degree counting.
    pub const fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set whether to normalize degree values.
    pub const fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Set the maximum number of nodes allowed.
    pub const fn with_max_graph_nodes(mut self, limit: Option<usize>) -> Self {
        self.max_graph_nodes = limit;
        self
    }
}

/// Result of Degree Centrality computation.
#[derive(Debug, Clone)]
pub struct DegreeCentralityResult {
    /// Degree centrality scores for each node.
    pub scores: ScoreMap,

    /// Whether scores are normalized.
    pub normalized: bool,

    /// The direction used for computation.
    pub direction: Direction,
}

/// Degree Centrality algorithm implementation.
pub struct DegreeCentrality;

impl DegreeCentrality {
    /// Compute degree centrality for all nodes in the graph.
    pub fn compute(
        graph: &Graph,
        config: &DegreeCentralityConfig,
    ) -> GraphResult<DegreeCentralityResult> {
        check_graph_size(graph, config.max_graph_nodes)?;

        let n = graph.node_count();
        let mut scores: Vec<f64> = (0..n)
            .map(|i| {
                graph.neighbors(i, config.direction).iter().filter(|&&j| j != i).count() as f64
            })
            .collect();

        if config.normalize {
            let factor = if n > 1 { 1.0 / (n - 1) as f64 } else { 0.0 };
            for score in &mut scores {
                *score *= factor;
            }
        }

        Ok(DegreeCentralityResult {
            scores: ScoreMap::from_dense(graph, scores),
            normalized: config.normalize,
            direction: config.direction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = DegreeCentralityConfig::default();
        assert_eq!(config.direction, Direction::Both);
        assert!(config.normalize);
        assert_eq!(config.max_graph_nodes, Some(DEFAULT_MAX_GRAPH_NODES));
    }

    #[test]
    fn config_builder() {
        let config = DegreeCentralityConfig::new()
            .with_direction(Direction::Outgoing)
            .with_normalize(false)
            .with_max_graph_nodes(Some(1000));

        assert_eq!(config.direction, Direction::Outgoing);
        assert!(!config.normalize);
        assert_eq!(config.max_graph_nodes, Some(1000));
    }
}
