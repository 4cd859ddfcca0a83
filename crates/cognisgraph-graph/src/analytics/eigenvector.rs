//! Eigenvector Centrality implementation.
//!
//! A node is important if important nodes link to it. Scores are the
//! dominant eigenvector of the adjacency matrix, found by power iteration.
//!
//! # Formula
//!
//! The iteration uses the shifted matrix (A + I) so that periodic structures
//! such as two-node cycles still converge:
//!
//! x(k+1) = (A + I) * x(k) / ||(A + I) * x(k)||
//!
//! Scores have unit L2 norm, so each lies in [0, 1]. A graph without edges
//! has no meaningful eigenvector and scores 0 everywhere.

use super::{check_graph_size, ScoreMap};
use super::pagerank::DEFAULT_MAX_GRAPH_NODES;
use crate::store::{Graph, GraphResult};
use crate::traversal::Direction;

/// Configuration for Eigenvector Centrality computation.
#[derive(Debug, Clone)]
pub struct EigenvectorCentralityConfig {
    /// Direction whose neighbors contribute to a node's score.
    /// Default: Incoming (a node is scored by who links to it)
    pub direction: Direction,

    /// Maximum number of iterations before stopping.
    /// Default: 100
    pub max_iterations: usize,

    /// Convergence tolerance. Algorithm stops when max score change < tolerance.
    /// Default: 1e-6
    pub tolerance: f64,

    /// Maximum number of nodes allowed before returning an error.
    /// Default: 10,000,000
    pub max_graph_nodes: Option<usize>,
}

impl Default for EigenvectorCentralityConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Incoming,
            max_iterations: 100,
            tolerance: 1e-6,
            max_graph_nodes: Some(DEFAULT_MAX_GRAPH_NODES),
        }
    }
}

impl EigenvectorCentralityConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the direction for following edges.
    pub const fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the maximum number of iterations.
    pub const fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance.
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the maximum number of nodes allowed.
    pub const fn with_max_graph_nodes(mut self, limit: Option<usize>) -> Self {
        self.max_graph_nodes = limit;
        self
    }
}

/// Result of Eigenvector Centrality computation.
#[derive(Debug, Clone)]
pub struct EigenvectorCentralityResult {
    /// Eigenvector centrality scores for each node.
    pub scores: ScoreMap,

    /// Number of iterations performed.
    pub iterations: usize,

    /// Whether the algorithm converged within tolerance.
    pub converged: bool,

    /// Final convergence delta (max change in last iteration).
    pub final_delta: f64,
}

/// Eigenvector Centrality algorithm implementation.
pub struct EigenvectorCentrality;

impl EigenvectorCentrality {
    /// Compute eigenvector centrality for all nodes in the graph.
    ///
    /// Running out of iterations is not an error; check
    /// [`EigenvectorCentralityResult::converged`].
    pub fn compute(
        graph: &Graph,
        config: &EigenvectorCentralityConfig,
    ) -> GraphResult<EigenvectorCentralityResult> {
        check_graph_size(graph, config.max_graph_nodes)?;

        let n = graph.node_count();
        if n == 0 || graph.edge_count() == 0 {
            return Ok(EigenvectorCentralityResult {
                scores: ScoreMap::from_dense(graph, vec![0.0; n]),
                iterations: 0,
                converged: true,
                final_delta: 0.0,
            });
        }

        let neighbors: Vec<Vec<usize>> =
            (0..n).map(|i| graph.neighbors(i, config.direction)).collect();

        let mut scores: Vec<f64> = vec![1.0 / (n as f64).sqrt(); n];
        let mut new_scores: Vec<f64> = vec![0.0; n];

        let mut iterations = 0;
        let mut converged = false;
        let mut final_delta = f64::MAX;

        while iterations < config.max_iterations {
            iterations += 1;

            for (i, slot) in new_scores.iter_mut().enumerate() {
                *slot = scores[i] + neighbors[i].iter().map(|&j| scores[j]).sum::<f64>();
            }

            let norm: f64 = new_scores.iter().map(|&x| x * x).sum::<f64>().sqrt();
            if norm > f64::EPSILON {
                for score in &mut new_scores {
                    *score /= norm;
                }
            }

            let max_delta = scores
                .iter()
                .zip(&new_scores)
                .map(|(old, new)| (new - old).abs())
                .fold(0.0f64, f64::max);
            final_delta = max_delta;

            std::mem::swap(&mut scores, &mut new_scores);

            if max_delta < config.tolerance {
                converged = true;
                break;
            }
        }

        Ok(EigenvectorCentralityResult {
            scores: ScoreMap::from_dense(graph, scores),
            iterations,
            converged,
            final_delta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = EigenvectorCentralityConfig::default();
        assert_eq!(config.direction, Direction::Incoming);
        assert_eq!(config.max_iterations, 100);
        assert!((config.tolerance - 1e-6).abs() < f64::EPSILON);
    }

    #[test]
    fn config_builder() {
        let config = EigenvectorCentralityConfig::new()
            .with_direction(Direction::Both)
            .with_max_iterations(500)
            .with_tolerance(1e-5)
            .with_max_graph_nodes(Some(10));
        assert_eq!(config.direction, Direction::Both);
        assert_eq!(config.max_iterations, 500);
        assert_eq!(config.max_graph_nodes, Some(10));
    }

    #[test]
    fn edgeless_graph_scores_zero() {
        let graph = Graph::from_parts(
            vec![cognisgraph_core::Entity::new("x", "Node")],
            Vec::new(),
        )
        .expect("valid graph");
        let config = EigenvectorCentralityConfig::default();
        let result = EigenvectorCentrality::compute(&graph, &config).expect("ok");
        assert!(result.converged);
        assert_eq!(result.scores.get("x"), Some(0.0));
    }
}
