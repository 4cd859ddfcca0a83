//! Feature importance: which kinds of information carry the graph.
//!
//! Two views:
//!
//! - [`FeatureImportanceAnalyzer::analyze`] scores coarse categories (node
//!   type, property richness, relationship density) over the whole graph or
//!   the one-hop neighborhood of some entities, and ranks property keys by
//!   frequency.
//! - [`FeatureImportanceAnalyzer::calculate_importance`] scores one entity:
//!   its four centrality measures, how common each of its property values
//!   is, and how common each pair of its property values is.
//!
//! The category scores are heuristics:
//!
//! | Category | Score |
//! |----------|-------|
//! | `type` | `min(1, distinct types / 10)` |
//! | `properties` | `min(1, mean properties per node / 5)` |
//! | `relationships` | `min(1, mean relationship degree / 10)` |

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use cognisgraph_core::{Entity, EntityId, Value};
use cognisgraph_graph::analytics::DEFAULT_MAX_GRAPH_NODES;
use cognisgraph_graph::{Graph, GraphError, KnowledgeStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::XaiResult;
use crate::saliency::{CentralityCalculator, CentralityConfig};

/// Configuration for feature importance.
#[derive(Debug, Clone)]
pub struct FeatureImportanceConfig {
    /// Property keys kept in the ranking.
    /// Default: 5
    pub top_features: usize,

    /// Distinct types that saturate the `type` score.
    /// Default: 10
    pub type_normalizer: f64,

    /// Mean properties per node that saturate the `properties` score.
    /// Default: 5
    pub property_normalizer: f64,

    /// Mean relationship degree that saturates the `relationships` score.
    /// Default: 10
    pub relationship_normalizer: f64,

    /// Node count at which confidence stops growing.
    /// Default: 100
    pub confidence_sample_size: f64,

    /// Confidence multipliers for `type`, `properties`, `relationships`.
    /// Default: 0.9, 0.8, 0.85
    pub confidence_multipliers: CategoryScores,

    /// Centrality settings for `calculate_importance`.
    pub centrality: CentralityConfig,

    /// Largest graph analyzed.
    /// Default: 10,000,000
    pub max_graph_nodes: Option<usize>,
}

impl Default for FeatureImportanceConfig {
    fn default() -> Self {
        Self {
            top_features: 5,
            type_normalizer: 10.0,
            property_normalizer: 5.0,
            relationship_normalizer: 10.0,
            confidence_sample_size: 100.0,
            confidence_multipliers: CategoryScores {
                entity_type: 0.9,
                properties: 0.8,
                relationships: 0.85,
            },
            centrality: CentralityConfig::default(),
            max_graph_nodes: Some(DEFAULT_MAX_GRAPH_NODES),
        }
    }
}

impl FeatureImportanceConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many property keys are ranked.
    #[must_use]
    pub const fn with_top_features(mut self, n: usize) -> Self {
        self.top_features = n;
        self
    }

    /// Set the centrality settings.
    #[must_use]
    pub fn with_centrality(mut self, centrality: CentralityConfig) -> Self {
        self.centrality = centrality;
        self
    }

    /// Set the largest graph analyzed.
    #[must_use]
    pub const fn with_max_graph_nodes(mut self, limit: Option<usize>) -> Self {
        self.max_graph_nodes = limit;
        self
    }
}

/// One score per feature category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    /// Node types.
    #[serde(rename = "type")]
    pub entity_type: f64,
    /// Node properties.
    pub properties: f64,
    /// Relationships.
    pub relationships: f64,
}

/// Output of [`FeatureImportanceAnalyzer::analyze`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportanceResult {
    /// Category scores in [0, 1].
    pub importance_scores: CategoryScores,
    /// Property keys with their frequency relative to the most common key.
    pub ranked_features: Vec<(String, f64)>,
    /// Category confidence, growing with the analyzed node count.
    pub confidence_scores: CategoryScores,
    /// Set when the analysis failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Memo key for value-frequency scores.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum FeatureKey {
    Single { entity: EntityId, feature: String, value: String },
    Combination { entity: EntityId, features: (String, String), values: (String, String) },
}

/// Scores feature categories and per-entity feature importance.
///
/// Centrality records and value frequencies are cached; neither cache is
/// cleared when the graph changes. Call [`clear_cache`](Self::clear_cache)
/// after writing to the store.
#[derive(Debug, Clone)]
pub struct FeatureImportanceAnalyzer {
    store: KnowledgeStore,
    graph: Arc<Graph>,
    config: FeatureImportanceConfig,
    centrality: CentralityCalculator,
    feature_cache: HashMap<FeatureKey, f64>,
}

impl FeatureImportanceAnalyzer {
    /// Create an analyzer over the store's current snapshot.
    pub fn new(store: &KnowledgeStore) -> Self {
        Self::with_config(store, FeatureImportanceConfig::default())
    }

    /// Create an analyzer with a custom configuration.
    pub fn with_config(store: &KnowledgeStore, config: FeatureImportanceConfig) -> Self {
        Self {
            store: store.clone(),
            graph: store.snapshot(),
            centrality: CentralityCalculator::new(config.centrality.clone()),
            config,
            feature_cache: HashMap::new(),
        }
    }

    /// The snapshot analyses run against.
    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    /// Adopt the store's current snapshot. Returns `true` if it changed.
    ///
    /// Caches are left alone.
    pub fn sync_graph(&mut self) -> bool {
        let current = self.store.snapshot();
        if Arc::ptr_eq(&current, &self.graph) {
            return false;
        }
        debug!(nodes = current.node_count(), "feature importance analyzer resynced");
        self.graph = current;
        true
    }

    /// Number of cached centrality records and value frequencies.
    pub fn cache_len(&self) -> usize {
        self.centrality.len() + self.feature_cache.len()
    }

    /// Drop both caches.
    pub fn clear_cache(&mut self) {
        self.centrality.clear();
        info!(entries = self.feature_cache.len(), "clearing feature cache");
        self.feature_cache.clear();
    }

    /// Score categories over the graph, or over the one-hop neighborhood of
    /// `entity_ids`. Never fails; errors land in `error`.
    pub fn analyze(&self, entity_ids: Option<&[EntityId]>) -> FeatureImportanceResult {
        self.try_analyze(entity_ids).unwrap_or_else(|e| {
            error!(error = %e, "feature importance analysis failed");
            FeatureImportanceResult {
                error: Some(format!("Analysis failed: {e}")),
                ..Default::default()
            }
        })
    }

    /// Score categories over the graph, or over the one-hop neighborhood of
    /// `entity_ids`.
    ///
    /// The neighborhood is the entities themselves plus their successors and
    /// predecessors; unknown IDs contribute nothing. An empty node set gives
    /// the all-zero result.
    pub fn try_analyze(
        &self,
        entity_ids: Option<&[EntityId]>,
    ) -> XaiResult<FeatureImportanceResult> {
        if let Some(limit) = self.config.max_graph_nodes {
            let node_count = self.graph.node_count();
            if node_count > limit {
                return Err(GraphError::GraphTooLarge { node_count, limit }.into());
            }
        }

        let neighborhood;
        let graph: &Graph = match entity_ids {
            None => self.graph.as_ref(),
            Some(ids) => {
                neighborhood = one_hop_subgraph(&self.graph, ids);
                &neighborhood
            }
        };
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "analyzing feature importance"
        );

        if graph.is_empty() {
            warn!("nothing to analyze, returning zero scores");
            return Ok(FeatureImportanceResult::default());
        }

        let n = graph.node_count() as f64;
        let distinct_types =
            graph.entities().map(|e| e.entity_type.as_str()).collect::<HashSet<_>>().len();
        let total_properties: usize = graph.entities().map(|e| e.properties.len()).sum();
        let total_degree: usize = (0..graph.node_count()).map(|i| graph.degree(i)).sum();
        let mean_properties = total_properties as f64 / n;
        let mean_degree = total_degree as f64 / n;

        let config = &self.config;
        let importance_scores = CategoryScores {
            entity_type: (distinct_types as f64 / config.type_normalizer).min(1.0),
            properties: (mean_properties / config.property_normalizer).min(1.0),
            relationships: (mean_degree / config.relationship_normalizer).min(1.0),
        };
        let confidence = (n / config.confidence_sample_size).min(1.0);
        let m = config.confidence_multipliers;
        let confidence_scores = CategoryScores {
            entity_type: confidence * m.entity_type,
            properties: confidence * m.properties,
            relationships: confidence * m.relationships,
        };

        Ok(FeatureImportanceResult {
            importance_scores,
            ranked_features: rank_property_keys(graph, config.top_features),
            confidence_scores,
            error: None,
        })
    }

    /// Importance of each feature of one entity.
    ///
    /// Keys are the four centrality names, `feature_{key}` for every scalar
    /// property, and `combination_{key1}_{key2}` for every pair of
    /// properties. An unknown entity gives an empty map.
    pub fn calculate_importance(&mut self, entity_id: &str) -> BTreeMap<String, f64> {
        let graph = Arc::clone(&self.graph);
        let Some(entity) = graph.entity(entity_id) else {
            warn!(entity = entity_id, "invalid entity for importance");
            return BTreeMap::new();
        };

        let mut scores = BTreeMap::new();
        match self.centrality.record(&graph, entity_id) {
            Ok(record) => {
                scores.extend(record.named().map(|(name, value)| (name.to_owned(), value)));
            }
            Err(e) => error!(entity = entity_id, error = %e, "centrality unavailable"),
        }

        for (feature, value) in entity.scalar_properties() {
            let score = self.value_frequency(&graph, entity, feature, value);
            scores.insert(format!("feature_{feature}"), score);
        }

        let properties: Vec<_> = entity.properties.iter().collect();
        for (i, &(f1, v1)) in properties.iter().enumerate() {
            for &(f2, v2) in &properties[i + 1..] {
                let score = self.combination_frequency(&graph, entity, (f1, v1), (f2, v2));
                scores.insert(format!("combination_{f1}_{f2}"), score);
            }
        }
        scores
    }

    /// Among other entities carrying `feature`, the fraction with `value`.
    fn value_frequency(
        &mut self,
        graph: &Graph,
        entity: &Entity,
        feature: &str,
        value: &Value,
    ) -> f64 {
        let key = FeatureKey::Single {
            entity: entity.id.clone(),
            feature: feature.to_owned(),
            value: value.to_string(),
        };
        if let Some(&score) = self.feature_cache.get(&key) {
            return score;
        }
        let others = graph.entities().filter(|other| other.id != entity.id);
        let score =
            fraction(others.filter_map(|other| other.get_property(feature).map(|v| v == value)));
        self.feature_cache.insert(key, score);
        score
    }

    /// Among other entities carrying both features, the fraction with both
    /// values.
    fn combination_frequency(
        &mut self,
        graph: &Graph,
        entity: &Entity,
        (f1, v1): (&String, &Value),
        (f2, v2): (&String, &Value),
    ) -> f64 {
        let key = FeatureKey::Combination {
            entity: entity.id.clone(),
            features: (f1.clone(), f2.clone()),
            values: (v1.to_string(), v2.to_string()),
        };
        if let Some(&score) = self.feature_cache.get(&key) {
            return score;
        }
        let others = graph.entities().filter(|other| other.id != entity.id);
        let score = fraction(others.filter_map(|other| {
            match (other.get_property(f1), other.get_property(f2)) {
                (Some(a), Some(b)) => Some(a == v1 && b == v2),
                _ => None,
            }
        }));
        self.feature_cache.insert(key, score);
        score
    }
}

/// Share of `true` values, 0 when empty.
fn fraction(matches: impl Iterator<Item = bool>) -> f64 {
    let (hits, total) = matches.fold((0usize, 0usize), |(h, t), m| (h + usize::from(m), t + 1));
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

/// The entities plus their successors and predecessors.
fn one_hop_subgraph(graph: &Graph, ids: &[EntityId]) -> Graph {
    let mut nodes = HashSet::new();
    for idx in ids.iter().filter_map(|id| graph.index_of(id.as_str())) {
        nodes.insert(idx);
        nodes.extend(graph.successors(idx).iter().copied());
        nodes.extend(graph.predecessors(idx).iter().copied());
    }
    graph.induced_subgraph(&nodes)
}

/// Property keys by how many entities carry them, relative to the most
/// common key. Ties keep first-seen order.
fn rank_property_keys(graph: &Graph, top: usize) -> Vec<(String, f64)> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();
    for key in graph.entities().flat_map(|e| e.properties.keys()) {
        match position.get(key.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                position.insert(key.as_str(), counts.len());
                counts.push((key.as_str(), 1));
            }
        }
    }
    let Some(max) = counts.iter().map(|&(_, c)| c).max() else {
        return Vec::new();
    };
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(top).map(|(key, c)| (key.to_owned(), c as f64 / max as f64)).collect()
}
