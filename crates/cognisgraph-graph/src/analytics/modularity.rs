//! Greedy modularity community detection (Clauset-Newman-Moore).
//!
//! Every node starts in its own community. At each step the pair of
//! connected communities whose merge gives the largest modularity gain is
//! merged, until no merge improves modularity. The graph is treated as
//! undirected and unweighted: reciprocal and parallel typed relationships
//! count as one link.
//!
//! # Formula
//!
//! With e_ij the fraction of link ends joining communities i and j and
//! a_i the fraction of link ends attached to community i:
//!
//! ΔQ(i, j) = 2 * (e_ij - a_i * a_j)
//!
//! Communities are reported largest first; ties keep the order of their
//! earliest-inserted member. Community IDs are positions in that order.

use std::collections::{BTreeMap, HashMap};

use cognisgraph_core::EntityId;

use super::check_graph_size;
use super::pagerank::DEFAULT_MAX_GRAPH_NODES;
use crate::store::{Graph, GraphResult};
use crate::traversal::Direction;

/// Configuration for greedy modularity community detection.
#[derive(Debug, Clone)]
pub struct GreedyModularityConfig {
    /// Stop merging once this many communities remain.
    /// Default: 1
    pub min_communities: usize,

    /// Maximum number of nodes allowed before returning an error.
    /// Default: 10,000,000
    pub max_graph_nodes: Option<usize>,
}

impl Default for GreedyModularityConfig {
    fn default() -> Self {
        Self { min_communities: 1, max_graph_nodes: Some(DEFAULT_MAX_GRAPH_NODES) }
    }
}

impl GreedyModularityConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the community count at which merging stops.
    pub const fn with_min_communities(mut self, min: usize) -> Self {
        self.min_communities = min;
        self
    }

    /// Set the maximum number of nodes allowed.
    pub const fn with_max_graph_nodes(mut self, limit: Option<usize>) -> Self {
        self.max_graph_nodes = limit;
        self
    }
}

/// Result of community detection.
#[derive(Debug, Clone, Default)]
pub struct CommunityResult {
    /// Community ID for each node.
    pub assignments: HashMap<EntityId, usize>,

    /// Members of each community, indexed by community ID.
    pub communities: Vec<Vec<EntityId>>,

    /// Modularity of the final partition.
    pub modularity: f64,

    /// Number of merges performed.
    pub merges: usize,
}

impl CommunityResult {
    /// Community ID of a node.
    pub fn community_of(&self, node: &str) -> Option<usize> {
        self.assignments.get(node).copied()
    }

    /// Members of a community.
    pub fn members(&self, community: usize) -> &[EntityId] {
        self.communities.get(community).map_or(&[], Vec::as_slice)
    }

    /// Number of communities found.
    pub fn num_communities(&self) -> usize {
        self.communities.len()
    }
}

/// Greedy modularity maximization.
pub struct GreedyModularity;

impl GreedyModularity {
    /// Detect communities over the whole graph.
    pub fn detect(graph: &Graph, config: &GreedyModularityConfig) -> GraphResult<CommunityResult> {
        check_graph_size(graph, config.max_graph_nodes)?;

        let n = graph.node_count();
        let adjacency: Vec<Vec<usize>> =
            (0..n).map(|i| graph.neighbors(i, Direction::Both)).collect();
        let link_ends: usize = adjacency.iter().map(Vec::len).sum();

        let mut members: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
        let mut alive: Vec<bool> = vec![true; n];
        let mut merges = 0;

        if link_ends > 0 {
            let two_m = link_ends as f64;
            let mut a: Vec<f64> = adjacency.iter().map(|nbrs| nbrs.len() as f64 / two_m).collect();
            // e[i][j]: fraction of link ends from community i into community j (i != j)
            let mut e: Vec<BTreeMap<usize, f64>> = adjacency
                .iter()
                .map(|nbrs| nbrs.iter().map(|&j| (j, 1.0 / two_m)).collect())
                .collect();
            let mut remaining = n;

            while remaining > config.min_communities.max(1) {
                let mut best: Option<(usize, usize, f64)> = None;
                for i in (0..n).filter(|&i| alive[i]) {
                    for (&j, &eij) in &e[i] {
                        if j <= i {
                            continue;
                        }
                        let dq = 2.0 * (eij - a[i] * a[j]);
                        if best.map_or(true, |(_, _, b)| dq > b) {
                            best = Some((i, j, dq));
                        }
                    }
                }

                let Some((i, j, dq)) = best else { break };
                if dq <= 0.0 {
                    break;
                }

                // Merge j into i
                let links_j = std::mem::take(&mut e[j]);
                for (k, w) in links_j {
                    e[k].remove(&j);
                    if k == i {
                        continue;
                    }
                    *e[i].entry(k).or_insert(0.0) += w;
                    *e[k].entry(i).or_insert(0.0) += w;
                }
                e[i].remove(&j);
                a[i] += a[j];
                a[j] = 0.0;
                let moved = std::mem::take(&mut members[j]);
                members[i].extend(moved);
                alive[j] = false;
                remaining -= 1;
                merges += 1;
            }
        }

        let mut groups: Vec<Vec<usize>> = members
            .into_iter()
            .zip(&alive)
            .filter(|(_, &live)| live)
            .map(|(mut group, _)| {
                group.sort_unstable();
                group
            })
            .collect();
        groups.sort_by(|x, y| y.len().cmp(&x.len()).then_with(|| x[0].cmp(&y[0])));

        let modularity = Self::modularity(&adjacency, &groups, link_ends);

        let mut assignments = HashMap::with_capacity(n);
        let communities: Vec<Vec<EntityId>> = groups
            .iter()
            .enumerate()
            .map(|(cid, group)| {
                group
                    .iter()
                    .map(|&v| {
                        let id = graph.id_at(v).clone();
                        assignments.insert(id.clone(), cid);
                        id
                    })
                    .collect()
            })
            .collect();

        Ok(CommunityResult { assignments, communities, modularity, merges })
    }

    /// Q = Σ_c (L_c / m - (d_c / 2m)^2) over undirected links.
    fn modularity(adjacency: &[Vec<usize>], groups: &[Vec<usize>], link_ends: usize) -> f64 {
        if link_ends == 0 {
            return 0.0;
        }
        let two_m = link_ends as f64;
        let mut community = vec![0usize; adjacency.len()];
        for (cid, group) in groups.iter().enumerate() {
            for &v in group {
                community[v] = cid;
            }
        }

        groups
            .iter()
            .enumerate()
            .map(|(cid, group)| {
                let internal_ends: usize = group
                    .iter()
                    .map(|&v| adjacency[v].iter().filter(|&&w| community[w] == cid).count())
                    .sum();
                let degree: usize = group.iter().map(|&v| adjacency[v].len()).sum();
                internal_ends as f64 / two_m - (degree as f64 / two_m).powi(2)
            })
            .sum()
    }
}
