//! Per-node centrality records and their cache.

use std::cell::OnceCell;
use std::collections::HashMap;

use cognisgraph_core::EntityId;
use cognisgraph_graph::analytics::{
    BetweennessCentrality, BetweennessCentralityConfig, ClosenessCentrality,
    ClosenessCentralityConfig, DegreeCentrality, DegreeCentralityConfig, ScoreMap,
};
use cognisgraph_graph::Graph;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::eigenvector::{EigenvectorPolicy, EigenvectorResolver};
use crate::error::{XaiError, XaiResult};

/// One of the four centrality measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measure {
    /// Degree centrality.
    Degree,
    /// Betweenness centrality.
    Betweenness,
    /// Closeness centrality.
    Closeness,
    /// Eigenvector centrality (with fallbacks).
    Eigenvector,
}

impl Measure {
    /// All measures in record order.
    pub const ALL: [Self; 4] =
        [Self::Degree, Self::Betweenness, Self::Closeness, Self::Eigenvector];

    /// The field name used in records and importance maps.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Degree => "degree_centrality",
            Self::Betweenness => "betweenness_centrality",
            Self::Closeness => "closeness_centrality",
            Self::Eigenvector => "eigenvector_centrality",
        }
    }
}

/// The four centrality scores of one node, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CentralityRecord {
    /// Degree centrality.
    pub degree_centrality: f64,
    /// Betweenness centrality.
    pub betweenness_centrality: f64,
    /// Closeness centrality.
    pub closeness_centrality: f64,
    /// Eigenvector centrality, or its fallback.
    pub eigenvector_centrality: f64,
}

impl CentralityRecord {
    /// The score of one measure.
    pub const fn get(&self, measure: Measure) -> f64 {
        match measure {
            Measure::Degree => self.degree_centrality,
            Measure::Betweenness => self.betweenness_centrality,
            Measure::Closeness => self.closeness_centrality,
            Measure::Eigenvector => self.eigenvector_centrality,
        }
    }

    fn set(&mut self, measure: Measure, value: f64) {
        let slot = match measure {
            Measure::Degree => &mut self.degree_centrality,
            Measure::Betweenness => &mut self.betweenness_centrality,
            Measure::Closeness => &mut self.closeness_centrality,
            Measure::Eigenvector => &mut self.eigenvector_centrality,
        };
        *slot = value;
    }

    /// `(name, score)` pairs in measure order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        Measure::ALL.into_iter().map(|m| (m.name(), self.get(m)))
    }
}

/// Algorithm settings for each measure.
#[derive(Debug, Clone, Default)]
pub struct CentralityConfig {
    /// Degree centrality.
    pub degree: DegreeCentralityConfig,
    /// Betweenness centrality.
    pub betweenness: BetweennessCentralityConfig,
    /// Closeness centrality.
    pub closeness: ClosenessCentralityConfig,
    /// Eigenvector attempts and fallbacks.
    pub eigenvector: EigenvectorPolicy,
}

impl CentralityConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one node limit to every measure.
    #[must_use]
    pub fn with_max_graph_nodes(mut self, limit: Option<usize>) -> Self {
        self.degree.max_graph_nodes = limit;
        self.betweenness.max_graph_nodes = limit;
        self.closeness.max_graph_nodes = limit;
        self.eigenvector.default.max_graph_nodes = limit;
        self.eigenvector.relaxed.max_graph_nodes = limit;
        self.eigenvector.very_relaxed.max_graph_nodes = limit;
        self.eigenvector.pagerank.max_graph_nodes = limit;
        self
    }

    /// Replace the eigenvector policy.
    #[must_use]
    pub fn with_eigenvector(mut self, policy: EigenvectorPolicy) -> Self {
        self.eigenvector = policy;
        self
    }
}

/// Whole-graph scores computed at most once per measure.
///
/// Nothing runs until a score is asked for, so an analysis that hits the
/// cache for every node never touches the algorithms.
struct CentralityBatch<'a> {
    graph: &'a Graph,
    config: &'a CentralityConfig,
    degree: OnceCell<Option<ScoreMap>>,
    betweenness: OnceCell<Option<ScoreMap>>,
    closeness: OnceCell<Option<ScoreMap>>,
    eigenvector: OnceCell<Option<ScoreMap>>,
}

impl<'a> CentralityBatch<'a> {
    fn new(graph: &'a Graph, config: &'a CentralityConfig) -> Self {
        Self {
            graph,
            config,
            degree: OnceCell::new(),
            betweenness: OnceCell::new(),
            closeness: OnceCell::new(),
            eigenvector: OnceCell::new(),
        }
    }

    fn scores(&self, measure: Measure) -> Option<&ScoreMap> {
        let cell = match measure {
            Measure::Degree => &self.degree,
            Measure::Betweenness => &self.betweenness,
            Measure::Closeness => &self.closeness,
            Measure::Eigenvector => &self.eigenvector,
        };
        cell.get_or_init(|| match self.compute(measure) {
            Ok(scores) => Some(scores),
            Err(e) => {
                error!(
                    measure = measure.name(),
                    error = %e,
                    "centrality measure failed, defaulting to 0.0"
                );
                None
            }
        })
        .as_ref()
    }

    fn compute(&self, measure: Measure) -> XaiResult<ScoreMap> {
        let graph = self.graph;
        let config = self.config;
        Ok(match measure {
            Measure::Degree => DegreeCentrality::compute(graph, &config.degree)?.scores,
            Measure::Betweenness => {
                BetweennessCentrality::compute(graph, &config.betweenness)?.scores
            }
            Measure::Closeness => ClosenessCentrality::compute(graph, &config.closeness)?.scores,
            Measure::Eigenvector => {
                let degree = self.scores(Measure::Degree);
                EigenvectorResolver::resolve(graph, &config.eigenvector, degree)?.scores
            }
        })
    }

    /// The record for one node. Each value is clamped to [0, 1]; a failed
    /// measure contributes 0.0.
    fn record(&self, node: &str) -> CentralityRecord {
        let mut record = CentralityRecord::default();
        for measure in Measure::ALL {
            let value = self.scores(measure).and_then(|s| s.get(node)).unwrap_or(0.0);
            record.set(measure, value.clamp(0.0, 1.0));
        }
        record
    }
}

/// Memoizes centrality records by node.
///
/// Entries survive graph changes: callers must [`clear`](Self::clear) after
/// the underlying graph is written to.
#[derive(Debug, Clone, Default)]
pub struct CentralityCalculator {
    config: CentralityConfig,
    cache: HashMap<EntityId, CentralityRecord>,
}

impl CentralityCalculator {
    /// Create a calculator with the given measure settings.
    pub fn new(config: CentralityConfig) -> Self {
        Self { config, cache: HashMap::new() }
    }

    /// The measure settings.
    pub fn config(&self) -> &CentralityConfig {
        &self.config
    }

    /// Records for `nodes`, computing only the cache misses.
    ///
    /// Nodes absent from `graph` are skipped.
    pub fn records<'n, I>(&mut self, graph: &Graph, nodes: I) -> Vec<(EntityId, CentralityRecord)>
    where
        I: IntoIterator<Item = &'n EntityId>,
    {
        let batch = CentralityBatch::new(graph, &self.config);
        let mut out = Vec::new();
        for node in nodes {
            if !graph.contains(node.as_str()) {
                continue;
            }
            let record = match self.cache.get(node) {
                Some(record) => {
                    debug!(node = %node, "centrality cache hit");
                    *record
                }
                None => {
                    let record = batch.record(node.as_str());
                    self.cache.insert(node.clone(), record);
                    record
                }
            };
            out.push((node.clone(), record));
        }
        out
    }

    /// The record for one node.
    pub fn record(&mut self, graph: &Graph, node: &str) -> XaiResult<CentralityRecord> {
        let id = EntityId::new(node);
        self.records(graph, [&id])
            .pop()
            .map(|(_, record)| record)
            .ok_or(XaiError::EntityNotFound(id))
    }

    /// A cached record, without computing.
    pub fn cached(&self, node: &str) -> Option<&CentralityRecord> {
        self.cache.get(node)
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drop every cached record.
    pub fn clear(&mut self) {
        info!(entries = self.cache.len(), "clearing centrality cache");
        self.cache.clear();
    }
}
