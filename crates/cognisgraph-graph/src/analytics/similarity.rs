//! Neighborhood-based node similarity.
//!
//! - [`jaccard_similarity`] - Jaccard coefficient: |A ∩ B| / |A ∪ B|
//! - [`NeighborhoodSimilarity`] - Rank every other node against one node
//!
//! A and B are the one-hop neighbor sets of the two nodes in the configured
//! direction. Two nodes without neighbors have similarity 0.

use std::cmp::Ordering;
use std::collections::HashSet;

use cognisgraph_core::EntityId;

use super::check_graph_size;
use super::pagerank::DEFAULT_MAX_GRAPH_NODES;
use crate::store::{Graph, GraphError, GraphResult, NodeIndex};
use crate::traversal::Direction;

/// Configuration for neighborhood similarity ranking.
#[derive(Debug, Clone)]
pub struct NeighborhoodSimilarityConfig {
    /// Which neighbors form a node's neighborhood.
    /// Default: Both
    pub direction: Direction,

    /// Keep at most this many candidates.
    /// Default: None (all)
    pub top_k: Option<usize>,

    /// Maximum number of nodes allowed before returning an error.
    /// Default: 10,000,000
    pub max_graph_nodes: Option<usize>,
}

impl Default for NeighborhoodSimilarityConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Both,
            top_k: None,
            max_graph_nodes: Some(DEFAULT_MAX_GRAPH_NODES),
        }
    }
}

impl NeighborhoodSimilarityConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the neighborhood direction.
    pub const fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Limit the number of candidates returned.
    pub const fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = Some(k);
        self
    }

    /// Set the maximum number of nodes allowed.
    pub const fn with_max_graph_nodes(mut self, limit: Option<usize>) -> Self {
        self.max_graph_nodes = limit;
        self
    }
}

fn neighborhood(graph: &Graph, node: NodeIndex, direction: Direction) -> HashSet<NodeIndex> {
    graph.neighbors(node, direction).into_iter().collect()
}

fn jaccard(a: &HashSet<NodeIndex>, b: &HashSet<NodeIndex>) -> f64 {
    let union_size = a.union(b).count();
    if union_size == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union_size as f64
}

/// Jaccard similarity of two nodes' neighbor sets.
pub fn jaccard_similarity(
    graph: &Graph,
    node1: &str,
    node2: &str,
    direction: Direction,
) -> GraphResult<f64> {
    let a = graph.index_of(node1).ok_or_else(|| GraphError::EntityNotFound(node1.into()))?;
    let b = graph.index_of(node2).ok_or_else(|| GraphError::EntityNotFound(node2.into()))?;
    Ok(jaccard(&neighborhood(graph, a, direction), &neighborhood(graph, b, direction)))
}

/// Ranks nodes by neighborhood overlap with a reference node.
pub struct NeighborhoodSimilarity;

impl NeighborhoodSimilarity {
    /// Every other node with its similarity to `node`, most similar first.
    ///
    /// Ties keep graph insertion order.
    pub fn most_similar(
        graph: &Graph,
        node: &str,
        config: &NeighborhoodSimilarityConfig,
    ) -> GraphResult<Vec<(EntityId, f64)>> {
        check_graph_size(graph, config.max_graph_nodes)?;
        let reference =
            graph.index_of(node).ok_or_else(|| GraphError::EntityNotFound(node.into()))?;
        let reference_set = neighborhood(graph, reference, config.direction);

        let mut ranked: Vec<(NodeIndex, f64)> = (0..graph.node_count())
            .filter(|&other| other != reference)
            .map(|other| {
                let candidate = neighborhood(graph, other, config.direction);
                (other, jaccard(&reference_set, &candidate))
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then_with(|| a.0.cmp(&b.0))
        });
        if let Some(k) = config.top_k {
            ranked.truncate(k);
        }

        Ok(ranked.into_iter().map(|(idx, score)| (graph.id_at(idx).clone(), score)).collect())
    }
}

#[cfg(test)]
mod tests {
    use cognisgraph_core::{Entity, Relationship};

    use super::*;

    fn graph() -> Graph {
        // a and b both point at x and y; c points at y only
        Graph::from_parts(
            ["a", "b", "c", "x", "y"].map(|id| Entity::new(id, "Node")),
            [("a", "x"), ("a", "y"), ("b", "x"), ("b", "y"), ("c", "y")]
                .map(|(s, t)| Relationship::new(s, t, "link")),
        )
        .expect("valid graph")
    }

    #[test]
    fn jaccard_of_shared_neighbors() {
        let g = graph();
        let ab = jaccard_similarity(&g, "a", "b", Direction::Outgoing).expect("ok");
        let ac = jaccard_similarity(&g, "a", "c", Direction::Outgoing).expect("ok");
        assert!((ab - 1.0).abs() < f64::EPSILON);
        assert!((ac - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn no_neighbors_is_zero_not_nan() {
        let mut g = graph();
        g.insert_entity(Entity::new("lonely", "Node")).expect("add");
        g.insert_entity(Entity::new("alone", "Node")).expect("add");
        let s = jaccard_similarity(&g, "lonely", "alone", Direction::Both).expect("ok");
        assert!(s.abs() < f64::EPSILON);
    }

    #[test]
    fn ranking_excludes_self_and_respects_top_k() {
        let g = graph();
        let config =
            NeighborhoodSimilarityConfig::new().with_direction(Direction::Outgoing).with_top_k(2);
        let ranked = NeighborhoodSimilarity::most_similar(&g, "a", &config).expect("ok");
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].0.as_str(), "b");
        assert_eq!(ranked[1].0.as_str(), "c");
        assert!(ranked.iter().all(|(id, _)| id.as_str() != "a"));
    }

    #[test]
    fn unknown_node_is_error() {
        let g = graph();
        let err = NeighborhoodSimilarity::most_similar(
            &g,
            "nope",
            &NeighborhoodSimilarityConfig::default(),
        );
        assert!(matches!(err, Err(GraphError::EntityNotFound(_))));
    }
}
