//! Counterfactual alternatives for a query result.
//!
//! For the entities a result touches, [`CounterfactualExplainer`] proposes
//! structurally similar entities, relationship types that could have joined
//! a connected pair instead, and other paths between pairs. Scores are
//! heuristics, not probabilities.
//!
//! The relationship plausibility score divides the edges of a type between
//! the pair, in either direction, by all edges of that type. Candidates
//! exclude only the types already used from the first entity to the second,
//! so a type the pair uses in reverse scores above zero while every other
//! candidate scores 0. It is a coarse signal, not a calibrated value.

mod suggest;

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use cognisgraph_core::EntityId;
use cognisgraph_graph::analytics::{NeighborhoodSimilarity, NeighborhoodSimilarityConfig};
use cognisgraph_graph::traversal::SimplePaths;
use cognisgraph_graph::{Graph, KnowledgeStore};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use suggest::{CounterfactualSuggestion, ProposedChange};

use crate::error::XaiResult;
use crate::query::QueryResult;
use crate::saliency::pair_key;

/// Configuration for counterfactual generation.
#[derive(Debug, Clone)]
pub struct CounterfactualConfig {
    /// Longest alternative path, in edges.
    /// Default: 4
    pub path_cutoff: usize,

    /// Seed for the relationship-type shuffle. `None` seeds from entropy.
    /// Default: None
    pub seed: Option<u64>,

    /// How entity similarity is measured.
    pub similarity: NeighborhoodSimilarityConfig,
}

impl Default for CounterfactualConfig {
    fn default() -> Self {
        Self { path_cutoff: 4, seed: None, similarity: NeighborhoodSimilarityConfig::default() }
    }
}

impl CounterfactualConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the longest alternative path.
    #[must_use]
    pub const fn with_path_cutoff(mut self, cutoff: usize) -> Self {
        self.path_cutoff = cutoff;
        self
    }

    /// Make the relationship-type shuffle reproducible.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the similarity measure.
    #[must_use]
    pub fn with_similarity(mut self, similarity: NeighborhoodSimilarityConfig) -> Self {
        self.similarity = similarity;
        self
    }
}

/// An entity that could stand in for an involved one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityAlternative {
    /// The candidate.
    pub entity: EntityId,
    /// Jaccard similarity of the two neighborhoods.
    pub similarity_score: f64,
    /// Why it was proposed.
    pub explanation: String,
}

/// A relationship type a connected pair does not use yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipAlternative {
    /// The candidate type.
    pub relationship_type: String,
    /// Edges of this type between the pair over all edges of this type.
    pub plausibility_score: f64,
    /// Why it was proposed.
    pub explanation: String,
}

/// Another path between a pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathAlternative {
    /// Node sequence from the first entity to the second.
    pub path: Vec<EntityId>,
    /// Number of edges.
    pub length: usize,
    /// `1 / length`.
    pub plausibility_score: f64,
    /// Why it was proposed.
    pub explanation: String,
}

/// Output of [`CounterfactualExplainer::generate_counterfactuals`].
///
/// Every list holds at most the requested number of alternatives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterfactualResult {
    /// Alternatives per involved entity.
    pub entity_alternatives: BTreeMap<EntityId, Vec<EntityAlternative>>,
    /// Alternatives per connected pair, keyed `"a-b"`.
    pub relationship_alternatives: BTreeMap<String, Vec<RelationshipAlternative>>,
    /// Alternatives per pair, keyed `"a-b"`; empty when no path exists.
    pub path_alternatives: BTreeMap<String, Vec<PathAlternative>>,
}

impl CounterfactualResult {
    /// Length of the longest list in any section.
    pub fn max_list_len(&self) -> usize {
        let entity = self.entity_alternatives.values().map(Vec::len);
        let relationship = self.relationship_alternatives.values().map(Vec::len);
        let path = self.path_alternatives.values().map(Vec::len);
        entity.chain(relationship).chain(path).max().unwrap_or(0)
    }
}

/// Generates counterfactual alternatives.
#[derive(Debug, Clone)]
pub struct CounterfactualExplainer {
    store: KnowledgeStore,
    graph: Arc<Graph>,
    config: CounterfactualConfig,
    rng: StdRng,
}

impl CounterfactualExplainer {
    /// Create an explainer over the store's current snapshot.
    pub fn new(store: &KnowledgeStore) -> Self {
        Self::with_config(store, CounterfactualConfig::default())
    }

    /// Create an explainer with a custom configuration.
    pub fn with_config(store: &KnowledgeStore, config: CounterfactualConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { store: store.clone(), graph: store.snapshot(), config, rng }
    }

    /// The snapshot alternatives are drawn from.
    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    /// Adopt the store's current snapshot. Returns `true` if it changed.
    pub fn sync_graph(&mut self) -> bool {
        let current = self.store.snapshot();
        if Arc::ptr_eq(&current, &self.graph) {
            return false;
        }
        debug!(nodes = current.node_count(), "counterfactual explainer resynced");
        self.graph = current;
        true
    }

    /// Alternatives for the entities `result` involves.
    ///
    /// A pair with no path gets an empty path list; that is not an error.
    pub fn generate_counterfactuals(
        &mut self,
        query: &str,
        result: &QueryResult,
        num_alternatives: usize,
    ) -> XaiResult<CounterfactualResult> {
        let graph = Arc::clone(&self.graph);
        let mut involved = result.involved_entities();
        involved.sort();
        debug!(query, entities = involved.len(), num_alternatives, "generating counterfactuals");

        let mut out = CounterfactualResult::default();
        for entity in &involved {
            let alternatives = self.entity_alternatives(&graph, entity, num_alternatives)?;
            out.entity_alternatives.insert(entity.clone(), alternatives);
        }

        let known: Vec<&EntityId> =
            involved.iter().filter(|id| graph.contains(id.as_str())).collect();
        for (i, &a) in known.iter().enumerate() {
            for &b in &known[i + 1..] {
                let key = pair_key(a.as_str(), b.as_str());
                if let Some(alternatives) =
                    self.relationship_alternatives(&graph, a, b, num_alternatives)
                {
                    out.relationship_alternatives.insert(key.clone(), alternatives);
                }
                let paths = self.path_alternatives(&graph, a, b, num_alternatives)?;
                out.path_alternatives.insert(key, paths);
            }
        }

        info!(
            entities = out.entity_alternatives.len(),
            pairs = out.path_alternatives.len(),
            "counterfactuals generated"
        );
        Ok(out)
    }

    fn entity_alternatives(
        &self,
        graph: &Graph,
        entity: &EntityId,
        n: usize,
    ) -> XaiResult<Vec<EntityAlternative>> {
        if !graph.contains(entity.as_str()) {
            return Ok(Vec::new());
        }
        let similar =
            NeighborhoodSimilarity::most_similar(graph, entity.as_str(), &self.config.similarity)?;
        Ok(similar
            .into_iter()
            .take(n)
            .map(|(candidate, score)| EntityAlternative {
                entity: candidate,
                similarity_score: score,
                explanation: format!(
                    "Similar to {entity} based on graph structure and relationships"
                ),
            })
            .collect())
    }

    /// `None` when the pair is not directly connected.
    fn relationship_alternatives(
        &mut self,
        graph: &Graph,
        a: &EntityId,
        b: &EntityId,
        n: usize,
    ) -> Option<Vec<RelationshipAlternative>> {
        let ia = graph.index_of(a.as_str())?;
        let ib = graph.index_of(b.as_str())?;
        let forward: Vec<_> = graph.relationships_between(ia, ib).collect();
        let backward: Vec<_> = graph.relationships_between(ib, ia).collect();
        if forward.is_empty() && backward.is_empty() {
            return None;
        }
        // Only `a -> b` types are taken; a type used solely on `b -> a`
        // stays a candidate and scores against the reverse edge.
        let used: HashSet<&str> = forward.iter().map(|r| r.rel_type.as_str()).collect();
        let mut candidates: Vec<&str> =
            graph.relationship_types().into_iter().filter(|t| !used.contains(t)).collect();
        candidates.shuffle(&mut self.rng);

        Some(
            candidates
                .into_iter()
                .take(n)
                .map(|rel_type| {
                    let total = graph.count_of_type(rel_type);
                    let joining =
                        forward.iter().chain(&backward).filter(|r| r.rel_type == rel_type).count();
                    let plausibility_score =
                        if total == 0 { 0.0 } else { joining as f64 / total as f64 };
                    RelationshipAlternative {
                        relationship_type: rel_type.to_owned(),
                        plausibility_score,
                        explanation: format!(
                            "Alternative relationship type that could connect {a} and {b}"
                        ),
                    }
                })
                .collect(),
        )
    }

    fn path_alternatives(
        &self,
        graph: &Graph,
        a: &EntityId,
        b: &EntityId,
        n: usize,
    ) -> XaiResult<Vec<PathAlternative>> {
        let mut paths =
            SimplePaths::new(a.clone(), b.clone(), self.config.path_cutoff).execute(graph)?;
        paths.sort_by_key(|p| p.length);
        Ok(paths
            .into_iter()
            .take(n)
            .map(|p| PathAlternative {
                length: p.length,
                plausibility_score: 1.0 / p.length as f64,
                path: p.nodes,
                explanation: format!("Alternative path connecting {a} and {b}"),
            })
            .collect())
    }
}
