//! Structural saliency: centrality, path importance, and community roles.
//!
//! [`SaliencyAnalyzer`] holds a handle to the [`KnowledgeStore`] and the
//! snapshot it last synchronized with. It never re-reads the store on its
//! own; callers (usually the explainer) call
//! [`sync_graph`](SaliencyAnalyzer::sync_graph) before an analysis.
//!
//! # Example
//!
//! ```ignore
//! let mut analyzer = SaliencyAnalyzer::new(&store);
//! let result = analyzer.analyze(Some(&[EntityId::new("rust")]));
//! let record = &result.centrality_scores[&EntityId::new("rust")];
//! ```

mod centrality;
mod community;
mod eigenvector;
mod paths;

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use cognisgraph_core::EntityId;
use cognisgraph_graph::analytics::{GreedyModularityConfig, DEFAULT_MAX_GRAPH_NODES};
use cognisgraph_graph::{Graph, GraphError, KnowledgeStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

pub use centrality::{CentralityCalculator, CentralityConfig, CentralityRecord, Measure};
pub use community::{analyze_roles, CommunityRole, RoleRecord};
pub use eigenvector::{EigenvectorOutcome, EigenvectorPolicy, EigenvectorResolver, EigenvectorStage};
pub use paths::{analyze_paths, pair_key, path_set_importance, PathImportance};

use crate::error::XaiResult;

/// Configuration for saliency analysis.
#[derive(Debug, Clone)]
pub struct SaliencyConfig {
    /// Per-measure settings.
    pub centrality: CentralityConfig,

    /// Community detection settings.
    pub community: GreedyModularityConfig,

    /// Largest graph analyzed at all.
    /// Default: 10,000,000
    pub max_graph_nodes: Option<usize>,
}

impl Default for SaliencyConfig {
    fn default() -> Self {
        Self {
            centrality: CentralityConfig::default(),
            community: GreedyModularityConfig::default(),
            max_graph_nodes: Some(DEFAULT_MAX_GRAPH_NODES),
        }
    }
}

impl SaliencyConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the measure settings.
    #[must_use]
    pub fn with_centrality(mut self, centrality: CentralityConfig) -> Self {
        self.centrality = centrality;
        self
    }

    /// Set the community detection settings.
    #[must_use]
    pub fn with_community(mut self, community: GreedyModularityConfig) -> Self {
        self.community = community;
        self
    }

    /// Set the largest graph analyzed.
    #[must_use]
    pub const fn with_max_graph_nodes(mut self, limit: Option<usize>) -> Self {
        self.max_graph_nodes = limit;
        self
    }
}

/// Output of [`SaliencyAnalyzer::analyze`].
///
/// The default value (three empty maps, no error) is what an empty graph or
/// an all-unknown target list produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaliencyResult {
    /// Centrality record per analyzed node.
    pub centrality_scores: BTreeMap<EntityId, CentralityRecord>,
    /// Path importance keyed by `"a-b"`, stored for both orders.
    pub path_importance: BTreeMap<String, PathImportance>,
    /// Community placement per analyzed node.
    pub community_role: BTreeMap<EntityId, RoleRecord>,
    /// Set when the analysis as a whole failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaliencyResult {
    fn failed(message: String) -> Self {
        Self { error: Some(message), ..Self::default() }
    }
}

/// Computes centrality, path importance, and community roles.
///
/// Centrality records are cached per node and survive graph changes; call
/// [`clear_cache`](Self::clear_cache) after writing to the store.
#[derive(Debug, Clone)]
pub struct SaliencyAnalyzer {
    store: KnowledgeStore,
    graph: Arc<Graph>,
    config: SaliencyConfig,
    calculator: CentralityCalculator,
}

impl SaliencyAnalyzer {
    /// Create an analyzer over the store's current snapshot.
    pub fn new(store: &KnowledgeStore) -> Self {
        Self::with_config(store, SaliencyConfig::default())
    }

    /// Create an analyzer with a custom configuration.
    pub fn with_config(store: &KnowledgeStore, config: SaliencyConfig) -> Self {
        let calculator = CentralityCalculator::new(config.centrality.clone());
        Self { store: store.clone(), graph: store.snapshot(), config, calculator }
    }

    /// The snapshot analyses run against.
    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    /// The configuration.
    pub fn config(&self) -> &SaliencyConfig {
        &self.config
    }

    /// Adopt the store's current snapshot. Returns `true` if it changed.
    ///
    /// The centrality cache is left alone.
    pub fn sync_graph(&mut self) -> bool {
        let current = self.store.snapshot();
        if Arc::ptr_eq(&current, &self.graph) {
            return false;
        }
        debug!(
            nodes = current.node_count(),
            edges = current.edge_count(),
            "saliency analyzer resynced"
        );
        self.graph = current;
        true
    }

    /// The centrality record of one node, from cache when possible.
    ///
    /// An unknown node yields the all-zero record and is not cached.
    pub fn calculate_centrality(&mut self, entity_id: &str) -> CentralityRecord {
        let graph = Arc::clone(&self.graph);
        self.calculator.record(&graph, entity_id).unwrap_or_else(|e| {
            warn!(entity = entity_id, error = %e, "no centrality for unknown entity");
            CentralityRecord::default()
        })
    }

    /// Number of cached centrality records.
    pub fn cache_len(&self) -> usize {
        self.calculator.len()
    }

    /// Drop every cached centrality record.
    pub fn clear_cache(&mut self) {
        self.calculator.clear();
    }

    /// Analyze `targets`, or every node when `None`.
    ///
    /// Never fails: errors are logged and reported through
    /// [`SaliencyResult::error`].
    pub fn analyze(&mut self, targets: Option<&[EntityId]>) -> SaliencyResult {
        self.try_analyze(targets).unwrap_or_else(|e| {
            error!(error = %e, "saliency analysis failed");
            SaliencyResult::failed(e.to_string())
        })
    }

    /// Analyze `targets`, or every node when `None`.
    ///
    /// Unknown targets are dropped. An empty graph, or a target list with no
    /// known node, yields the default result. Individual measures, pairs,
    /// and the community section degrade on their own; only a graph above
    /// `max_graph_nodes` is an error.
    pub fn try_analyze(&mut self, targets: Option<&[EntityId]>) -> XaiResult<SaliencyResult> {
        let start = Instant::now();
        let graph = Arc::clone(&self.graph);

        if graph.is_empty() {
            warn!("graph is empty, nothing to analyze");
            return Ok(SaliencyResult::default());
        }
        if let Some(limit) = self.config.max_graph_nodes {
            let node_count = graph.node_count();
            if node_count > limit {
                return Err(GraphError::GraphTooLarge { node_count, limit }.into());
            }
        }

        let nodes = resolve_targets(&graph, targets);
        if nodes.is_empty() {
            warn!(
                requested = targets.map_or(0, <[EntityId]>::len),
                "none of the target nodes are in the graph"
            );
            return Ok(SaliencyResult::default());
        }

        let centrality_scores = self.calculator.records(&graph, &nodes).into_iter().collect();
        let path_importance = analyze_paths(&graph, &nodes);
        let community_role = analyze_roles(&graph, &nodes, &self.config.community)
            .unwrap_or_else(|e| {
                error!(error = %e, "community role analysis failed");
                BTreeMap::new()
            });

        info!(
            nodes = nodes.len(),
            pairs = path_importance.len() / 2,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "saliency analysis complete"
        );
        Ok(SaliencyResult { centrality_scores, path_importance, community_role, error: None })
    }
}

/// Known targets in request order without repeats, or every node.
fn resolve_targets(graph: &Graph, targets: Option<&[EntityId]>) -> Vec<EntityId> {
    match targets {
        None => graph.entities().map(|e| e.id.clone()).collect(),
        Some(requested) => {
            let mut seen = HashSet::new();
            requested
                .iter()
                .filter(|id| graph.contains(id.as_str()) && seen.insert(id.as_str()))
                .cloned()
                .collect()
        }
    }
}
