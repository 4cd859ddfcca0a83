//! Per-node score map shared by the centrality results.

use std::cmp::Ordering;
use std::collections::HashMap;

use cognisgraph_core::EntityId;

use crate::store::Graph;

/// Scores keyed by entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreMap(HashMap<EntityId, f64>);

impl ScoreMap {
    /// Pair dense-index scores with the graph's entity IDs.
    pub(crate) fn from_dense(graph: &Graph, scores: Vec<f64>) -> Self {
        Self(scores.into_iter().enumerate().map(|(i, s)| (graph.id_at(i).clone(), s)).collect())
    }

    /// Score of one node.
    pub fn get(&self, node: &str) -> Option<f64> {
        self.0.get(node).copied()
    }

    /// Number of scored nodes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing was scored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(node, score)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, f64)> {
        self.0.iter().map(|(id, &s)| (id, s))
    }

    /// Nodes sorted by score, descending; ties by ID.
    pub fn sorted(&self) -> Vec<(EntityId, f64)> {
        let mut pairs: Vec<_> = self.0.iter().map(|(id, &s)| (id.clone(), s)).collect();
        pairs.sort_by(|a, b| {
            b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then_with(|| a.0.cmp(&b.0))
        });
        pairs
    }

    /// The top N nodes by score.
    pub fn top_n(&self, n: usize) -> Vec<(EntityId, f64)> {
        self.sorted().into_iter().take(n).collect()
    }

    /// The highest-scoring node.
    pub fn max(&self) -> Option<(EntityId, f64)> {
        self.sorted().into_iter().next()
    }

    /// Mean score, 0 when empty.
    pub fn mean(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0.values().sum::<f64>() / self.0.len() as f64
    }
}

impl FromIterator<(EntityId, f64)> for ScoreMap {
    fn from_iter<I: IntoIterator<Item = (EntityId, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
