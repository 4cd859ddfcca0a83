//! Rules, patterns, and typed paths around entities.

use std::collections::HashMap;
use std::sync::Arc;

use cognisgraph_core::{EntityId, Properties, Relationship};
use cognisgraph_graph::traversal::{SimplePaths, SingleSourceShortestPaths};
use cognisgraph_graph::{Direction, Graph, KnowledgeStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

/// Defaults for [`RuleExtractor`].
#[derive(Debug, Clone)]
pub struct RuleExtractorConfig {
    /// Hops explored by `extract_rules` when no depth is given.
    /// Default: 2
    pub default_depth: usize,

    /// Longest path considered by `extract_common_paths` when no length is
    /// given.
    /// Default: 3
    pub default_path_length: usize,
}

impl Default for RuleExtractorConfig {
    fn default() -> Self {
        Self { default_depth: 2, default_path_length: 3 }
    }
}

impl RuleExtractorConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default rule depth.
    #[must_use]
    pub const fn with_default_depth(mut self, depth: usize) -> Self {
        self.default_depth = depth;
        self
    }

    /// Set the default common-path length.
    #[must_use]
    pub const fn with_default_path_length(mut self, length: usize) -> Self {
        self.default_path_length = length;
        self
    }
}

/// The last hop of a shortest path from the starting entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Origin of the final hop.
    pub source: EntityId,
    /// The reached entity.
    pub target: EntityId,
    /// Type of the final hop.
    #[serde(rename = "type")]
    pub rel_type: String,
    /// Properties of the final hop.
    pub properties: Properties,
    /// Hops from the starting entity.
    pub path_length: usize,
}

/// How often entities of one type link to entities of another type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    /// Type of the linking entities.
    pub source_type: String,
    /// Type of the linked entities.
    pub target_type: String,
    /// Relationship type.
    pub relationship_type: String,
    /// Number of relationships matching the triple.
    pub count: usize,
}

/// One hop of a [`PathInfo`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hop {
    /// Relationship type.
    #[serde(rename = "type")]
    pub rel_type: String,
    /// Relationship properties.
    pub properties: Properties,
}

/// A path between two typed entities with its relationship sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathInfo {
    /// Node sequence.
    pub path: Vec<EntityId>,
    /// Number of edges.
    pub length: usize,
    /// One entry per edge.
    pub relationships: Vec<Hop>,
}

/// Extracts rules and patterns from the graph.
#[derive(Debug, Clone)]
pub struct RuleExtractor {
    store: KnowledgeStore,
    graph: Arc<Graph>,
    config: RuleExtractorConfig,
}

impl RuleExtractor {
    /// Create an extractor over the store's current snapshot.
    pub fn new(store: &KnowledgeStore) -> Self {
        Self::with_config(store, RuleExtractorConfig::default())
    }

    /// Create an extractor with custom defaults.
    pub fn with_config(store: &KnowledgeStore, config: RuleExtractorConfig) -> Self {
        Self { store: store.clone(), graph: store.snapshot(), config }
    }

    /// The configured defaults.
    pub fn config(&self) -> &RuleExtractorConfig {
        &self.config
    }

    /// Adopt the store's current snapshot. Returns `true` if it changed.
    pub fn sync_graph(&mut self) -> bool {
        let current = self.store.snapshot();
        if Arc::ptr_eq(&current, &self.graph) {
            return false;
        }
        debug!(nodes = current.node_count(), "rule extractor resynced");
        self.graph = current;
        true
    }

    /// One rule per entity reachable within `depth` hops (default 2).
    ///
    /// Rules come in breadth-first discovery order. An unknown entity yields
    /// no rules.
    pub fn extract_rules(&self, entity_id: &str, depth: Option<usize>) -> Vec<Rule> {
        let graph = &self.graph;
        if !graph.contains(entity_id) {
            warn!(entity = entity_id, "cannot extract rules for unknown entity");
            return Vec::new();
        }
        let depth = depth.unwrap_or(self.config.default_depth);
        let paths = match SingleSourceShortestPaths::new(entity_id, Direction::Outgoing)
            .with_cutoff(depth)
            .execute(graph)
        {
            Ok(paths) => paths,
            Err(e) => {
                error!(entity = entity_id, error = %e, "rule extraction failed");
                return Vec::new();
            }
        };

        paths
            .iter()
            .filter_map(|path| {
                let source = path.last_hop_source()?;
                let target = path.target()?;
                let relationship = first_between(graph, source, target)?;
                Some(Rule {
                    source: source.clone(),
                    target: target.clone(),
                    rel_type: relationship.rel_type.clone(),
                    properties: relationship.properties.clone(),
                    path_length: path.length,
                })
            })
            .collect()
    }

    /// `(source type, target type, relationship type)` counts over the
    /// outgoing relationships of every entity of `entity_type`, in first-seen
    /// order.
    pub fn extract_patterns(&self, entity_type: &str) -> Vec<Pattern> {
        let graph = &self.graph;
        let mut patterns: Vec<Pattern> = Vec::new();
        let mut position: HashMap<(&str, &str), usize> = HashMap::new();

        let sources =
            (0..graph.node_count()).filter(|&i| graph.entity_at(i).entity_type == entity_type);
        for idx in sources {
            for relationship in graph.outgoing_relationships(idx) {
                let Some(target) = graph.entity(relationship.target.as_str()) else {
                    continue;
                };
                let key = (target.entity_type.as_str(), relationship.rel_type.as_str());
                match position.get(&key) {
                    Some(&i) => patterns[i].count += 1,
                    None => {
                        position.insert(key, patterns.len());
                        patterns.push(Pattern {
                            source_type: entity_type.to_owned(),
                            target_type: key.0.to_owned(),
                            relationship_type: key.1.to_owned(),
                            count: 1,
                        });
                    }
                }
            }
        }
        patterns
    }

    /// Every simple path of at most `max_length` edges (default 3) from an
    /// entity of `source_type` to an entity of `target_type`.
    ///
    /// Each hop reports the first relationship inserted between its nodes.
    pub fn extract_common_paths(
        &self,
        source_type: &str,
        target_type: &str,
        max_length: Option<usize>,
    ) -> Vec<PathInfo> {
        let graph = &self.graph;
        let max_length = max_length.unwrap_or(self.config.default_path_length);
        let of_type = |t: &str| -> Vec<EntityId> {
            graph.entities().filter(|e| e.entity_type == t).map(|e| e.id.clone()).collect()
        };
        let sources = of_type(source_type);
        let targets = of_type(target_type);

        let mut out = Vec::new();
        for source in &sources {
            for target in &targets {
                let search = SimplePaths::new(source.clone(), target.clone(), max_length);
                let paths = match search.execute(graph) {
                    Ok(paths) => paths,
                    Err(e) => {
                        error!(
                            source = %source,
                            target = %target,
                            error = %e,
                            "path enumeration failed"
                        );
                        continue;
                    }
                };
                out.extend(paths.into_iter().map(|path| PathInfo {
                    relationships: hops(graph, &path.nodes),
                    length: path.length,
                    path: path.nodes,
                }));
            }
        }
        out
    }
}

fn first_between<'g>(
    graph: &'g Graph,
    source: &EntityId,
    target: &EntityId,
) -> Option<&'g Relationship> {
    graph.first_relationship(graph.index_of(source.as_str())?, graph.index_of(target.as_str())?)
}

fn hops(graph: &Graph, nodes: &[EntityId]) -> Vec<Hop> {
    nodes
        .windows(2)
        .filter_map(|pair| {
            let relationship = first_between(graph, &pair[0], &pair[1])?;
            Some(Hop {
                rel_type: relationship.rel_type.clone(),
                properties: relationship.properties.clone(),
            })
        })
        .collect()
}
