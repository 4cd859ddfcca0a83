//! PageRank algorithm implementation.
//!
//! PageRank assigns an importance score to each node based on the link
//! structure of the graph, using the iterative power method.
//!
//! # Formula
//!
//! PR(u) = (1-d)/N + d * Σ(PR(v)/L(v)) for all v linking to u
//!
//! Where:
//! - d is the damping factor (typically 0.85)
//! - N is the total number of nodes
//! - L(v) is the out-degree of node v
//!
//! Rank held by dangling nodes (no outgoing edges) is spread uniformly.

use super::{check_graph_size, ScoreMap};
use crate::store::{Graph, GraphResult};

/// Default limit on graph size for the analytics algorithms.
pub const DEFAULT_MAX_GRAPH_NODES: usize = 10_000_000;

/// Configuration for PageRank algorithm.
#[derive(Debug, Clone)]
pub struct PageRankConfig {
    /// Damping factor (probability of following a link vs random jump).
    /// Default: 0.85
    pub damping_factor: f64,

    /// Maximum number of iterations before stopping.
    /// Default: 100
    pub max_iterations: usize,

    /// Convergence tolerance on the largest per-node change.
    /// Default: 1e-6
    pub tolerance: f64,

    /// Maximum number of nodes allowed before returning an error.
    /// Default: 10,000,000
    pub max_graph_nodes: Option<usize>,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.85,
            max_iterations: 100,
            tolerance: 1e-6,
            max_graph_nodes: Some(DEFAULT_MAX_GRAPH_NODES),
        }
    }
}

impl PageRankConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the damping factor.
    pub const fn with_damping_factor(mut self, d: f64) -> Self {
        self.damping_factor = d;
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

/// Result of PageRank computation.
#[derive(Debug, Clone)]
pub struct PageRankResult {
    /// PageRank scores; they sum to 1.
    pub scores: ScoreMap,

    /// Number of iterations performed.
    pub iterations: usize,

    /// Whether the algorithm converged within tolerance.
    pub converged: bool,

    /// Final convergence delta (max change in last iteration).
    pub final_delta: f64,
}

/// PageRank algorithm implementation.
pub struct PageRank;

impl PageRank {
    /// Compute PageRank for all nodes in the graph.
    ///
    /// Non-convergence is reported through [`PageRankResult::converged`],
    /// not as an error.
    pub fn compute(graph: &Graph, config: &PageRankConfig) -> GraphResult<PageRankResult> {
        check_graph_size(graph, config.max_graph_nodes)?;

        let n = graph.node_count();
        if n == 0 {
            return Ok(PageRankResult {
                scores: ScoreMap::default(),
                iterations: 0,
                converged: true,
                final_delta: 0.0,
            });
        }

        let out_degrees: Vec<usize> = (0..n).map(|i| graph.successors(i).len()).collect();

        let mut scores: Vec<f64> = vec![1.0 / n as f64; n];
        let mut new_scores: Vec<f64> = vec![0.0; n];

        let d = config.damping_factor;
        let base_score = (1.0 - d) / n as f64;

        let mut iterations = 0;
        let mut converged = false;
        let mut final_delta = f64::MAX;

        while iterations < config.max_iterations {
            iterations += 1;

            let dangling_sum: f64 =
                (0..n).filter(|&i| out_degrees[i] == 0).map(|i| scores[i]).sum();
            let dangling_contribution = d * dangling_sum / n as f64;

            for (i, slot) in new_scores.iter_mut().enumerate() {
                let link_sum: f64 = graph
                    .predecessors(i)
                    .iter()
                    .map(|&j| scores[j] / out_degrees[j] as f64)
                    .sum();
                *slot = base_score + d * link_sum + dangling_contribution;
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

        let total: f64 = scores.iter().sum();
        if total > 0.0 {
            for score in &mut scores {
                *score /= total;
            }
        }

        Ok(PageRankResult {
            scores: ScoreMap::from_dense(graph, scores),
            iterations,
            converged,
            final_delta,
        })
    }
}
