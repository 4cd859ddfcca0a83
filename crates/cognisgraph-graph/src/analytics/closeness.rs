//! Closeness Centrality implementation.
//!
//! Closeness measures how close a node is to the rest of the graph, based on
//! shortest-path distances. Scores are always computed over the whole graph,
//! so they are comparable between calls that focus on different nodes.
//!
//! # Formula
//!
//! With r(v) the number of nodes that reach v (v included) and n the node
//! count, the Wasserman-Faust form scales by the reachable fraction so that
//! disconnected graphs stay within [0, 1]:
//!
//! CC(v) = ((r(v) - 1) / Σ d(u, v)) * ((r(v) - 1) / (n - 1))
//!
//! Harmonic centrality (optional):
//! HC(v) = Σ 1/d(u, v) / (n - 1)
//!
//! Distances follow the configured direction from v; the default `Incoming`
//! measures how close the rest of the graph is to v.

use std::collections::VecDeque;

use super::{check_graph_size, ScoreMap};
use super::pagerank::DEFAULT_MAX_GRAPH_NODES;
use crate::store::{Graph, GraphResult};
use crate::traversal::Direction;

/// Configuration for Closeness Centrality computation.
#[derive(Debug, Clone)]
pub struct ClosenessCentralityConfig {
    /// Direction of edges walked from the scored node.
    /// Default: Incoming
    pub direction: Direction,

    /// Whether to compute harmonic centrality instead of standard closeness.
    /// Default: false
    pub harmonic: bool,

    /// Maximum number of nodes allowed before returning an error.
    /// Default: 10,000,000
    pub max_graph_nodes: Option<usize>,
}

impl Default for ClosenessCentralityConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Incoming,
            harmonic: false,
            max_graph_nodes: Some(DEFAULT_MAX_GRAPH_NODES),
        }
    }
}

impl ClosenessCentralityConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the direction for BFS traversal.
    pub const fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set whether to compute harmonic centrality.
    pub const fn with_harmonic(mut self, harmonic: bool) -> Self {
        self.harmonic = harmonic;
        self
    }

    /// Set the maximum number of nodes allowed.
    pub const fn with_max_graph_nodes(mut self, limit: Option<usize>) -> Self {
        self.max_graph_nodes = limit;
        self
    }
}

/// Result of Closeness Centrality computation.
#[derive(Debug, Clone)]
pub struct ClosenessCentralityResult {
    /// Closeness scores for each node.
    pub scores: ScoreMap,

    /// Whether harmonic centrality was used.
    pub harmonic: bool,
}

/// Closeness Centrality algorithm implementation.
pub struct ClosenessCentrality;

impl ClosenessCentrality {
    /// Compute closeness centrality for all nodes in the graph.
    pub fn compute(
        graph: &Graph,
        config: &ClosenessCentralityConfig,
    ) -> GraphResult<ClosenessCentralityResult> {
        check_graph_size(graph, config.max_graph_nodes)?;

        let n = graph.node_count();
        let scores: Vec<f64> = (0..n).map(|v| Self::score_node(graph, v, config)).collect();

        Ok(ClosenessCentralityResult {
            scores: ScoreMap::from_dense(graph, scores),
            harmonic: config.harmonic,
        })
    }

    fn score_node(graph: &Graph, start: usize, config: &ClosenessCentralityConfig) -> f64 {
        let n = graph.node_count();
        if n <= 1 {
            return 0.0;
        }

        let mut dist: Vec<Option<usize>> = vec![None; n];
        dist[start] = Some(0);
        let mut queue = VecDeque::from([start]);
        let mut reached = 1usize;
        let mut total_distance = 0usize;
        let mut harmonic_sum = 0.0;

        while let Some(v) = queue.pop_front() {
            let dv = dist[v].unwrap_or(0);
            for w in graph.neighbors(v, config.direction) {
                if dist[w].is_none() {
                    dist[w] = Some(dv + 1);
                    reached += 1;
                    total_distance += dv + 1;
                    harmonic_sum += 1.0 / (dv + 1) as f64;
                    queue.push_back(w);
                }
            }
        }

        let others = (n - 1) as f64;
        if config.harmonic {
            return harmonic_sum / others;
        }
        if total_distance == 0 {
            return 0.0;
        }
        let reachable = (reached - 1) as f64;
        (reachable / total_distance as f64) * (reachable / others)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = ClosenessCentralityConfig::default();
        assert_eq!(config.direction, Direction::Incoming);
        assert!(!config.harmonic);
    }

    #[test]
    fn config_builder() {
        let config = ClosenessCentralityConfig::new()
            .with_direction(Direction::Both)
            .with_harmonic(true)
            .with_max_graph_nodes(None);
        assert_eq!(config.direction, Direction::Both);
        assert!(config.harmonic);
        assert!(config.max_graph_nodes.is_none());
    }
}
