//! Betweenness Centrality using Brandes' algorithm.
//!
//! Betweenness measures how often a node lies on shortest paths between
//! other nodes. Nodes with high betweenness act as bridges.
//!
//! # Complexity
//!
//! O(V * E) time and O(V + E) space for unweighted graphs.

use std::collections::VecDeque;

use super::{check_graph_size, ScoreMap};
use super::pagerank::DEFAULT_MAX_GRAPH_NODES;
use crate::store::{Graph, GraphResult};
use crate::traversal::Direction;

/// Configuration for Betweenness Centrality computation.
#[derive(Debug, Clone)]
pub struct BetweennessCentralityConfig {
    /// Whether to normalize by the number of ordered pairs excluding the node.
    /// Default: true
    pub normalize: bool,

    /// Direction of edges to follow. `Both` treats the graph as undirected.
    /// Default: Outgoing
    pub direction: Direction,

    /// Maximum number of nodes allowed before returning an error.
    /// Default: 10,000,000
    pub max_graph_nodes: Option<usize>,
}

impl Default for BetweennessCentralityConfig {
    fn default() -> Self {
        Self {
            normalize: true,
            direction: Direction::Outgoing,
            max_graph_nodes: Some(DEFAULT_MAX_GRAPH_NODES),
        }
    }
}

impl BetweennessCentralityConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to normalize scores.
    pub const fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Set the direction for traversal.
    pub const fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the maximum number of nodes allowed.
    pub const fn with_max_graph_nodes(mut self, limit: Option<usize>) -> Self {
        self.max_graph_nodes = limit;
        self
    }
}

/// Result of Betweenness Centrality computation.
#[derive(Debug, Clone)]
pub struct BetweennessCentralityResult {
    /// Betweenness scores for each node.
    pub scores: ScoreMap,

    /// Whether scores are normalized.
    pub normalized: bool,
}

/// Betweenness Centrality algorithm implementation.
pub struct BetweennessCentrality;

impl BetweennessCentrality {
    /// Compute betweenness centrality for all nodes in the graph.
    pub fn compute(
        graph: &Graph,
        config: &BetweennessCentralityConfig,
    ) -> GraphResult<BetweennessCentralityResult> {
        check_graph_size(graph, config.max_graph_nodes)?;

        let n = graph.node_count();
        let neighbors: Vec<Vec<usize>> = (0..n)
            .map(|i| graph.neighbors(i, config.direction).into_iter().filter(|&j| j != i).collect())
            .collect();

        let mut centrality: Vec<f64> = vec![0.0; n];

        for s in 0..n {
            let mut stack: Vec<usize> = Vec::with_capacity(n);
            let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
            let mut sigma: Vec<f64> = vec![0.0; n];
            let mut dist: Vec<Option<usize>> = vec![None; n];
            sigma[s] = 1.0;
            dist[s] = Some(0);

            let mut queue: VecDeque<usize> = VecDeque::from([s]);
            while let Some(v) = queue.pop_front() {
                stack.push(v);
                let dv = dist[v].unwrap_or(0);
                for &w in &neighbors[v] {
                    if dist[w].is_none() {
                        dist[w] = Some(dv + 1);
                        queue.push_back(w);
                    }
                    if dist[w] == Some(dv + 1) {
                        sigma[w] += sigma[v];
                        predecessors[w].push(v);
                    }
                }
            }

            // Dependency accumulation in reverse BFS order
            let mut delta: Vec<f64> = vec![0.0; n];
            while let Some(w) = stack.pop() {
                for &v in &predecessors[w] {
                    delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
                }
                if w != s {
                    centrality[w] += delta[w];
                }
            }
        }

        if config.direction == Direction::Both {
            for score in &mut centrality {
                *score /= 2.0;
            }
        }

        if config.normalize {
            let factor = if n <= 2 {
                0.0
            } else if config.direction == Direction::Both {
                2.0 / ((n - 1) * (n - 2)) as f64
            } else {
                1.0 / ((n - 1) * (n - 2)) as f64
            };
            for score in &mut centrality {
                *score *= factor;
            }
        }

        Ok(BetweennessCentralityResult {
            scores: ScoreMap::from_dense(graph, centrality),
            normalized: config.normalize,
        })
    }
}
