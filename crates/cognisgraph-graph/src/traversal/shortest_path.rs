//! Unweighted shortest path algorithms.

use std::collections::VecDeque;

use cognisgraph_core::EntityId;
use serde::{Deserialize, Serialize};

use super::Direction;
use crate::store::{Graph, GraphError, GraphResult, NodeIndex};

/// A path through the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathResult {
    /// The nodes in the path, from source to target.
    pub nodes: Vec<EntityId>,
    /// The number of edges in the path.
    pub length: usize,
}

impl PathResult {
    /// Create a path from a node sequence.
    pub fn new(nodes: Vec<EntityId>) -> Self {
        let length = nodes.len().saturating_sub(1);
        Self { nodes, length }
    }

    pub(crate) fn from_indices(graph: &Graph, indices: &[NodeIndex]) -> Self {
        Self::new(indices.iter().map(|&i| graph.id_at(i).clone()).collect())
    }

    /// Get the source node.
    pub fn source(&self) -> Option<&EntityId> {
        self.nodes.first()
    }

    /// Get the target node.
    pub fn target(&self) -> Option<&EntityId> {
        self.nodes.last()
    }

    /// The second-to-last node, i.e. the origin of the final hop.
    pub fn last_hop_source(&self) -> Option<&EntityId> {
        self.nodes.len().checked_sub(2).map(|i| &self.nodes[i])
    }

    /// Check if the path is a single node (source == target).
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

fn resolve(graph: &Graph, id: &EntityId) -> GraphResult<NodeIndex> {
    graph.index_of(id.as_str()).ok_or_else(|| GraphError::EntityNotFound(id.clone()))
}

/// BFS-based shortest path finder.
///
/// Finds the shortest unweighted path between two nodes, or every path tied
/// for shortest.
///
/// # Example
///
/// ```ignore
/// let paths = ShortestPath::new("a", "c", Direction::Outgoing).find_all(&graph)?;
/// for path in paths {
///     println!("{:?}", path.nodes);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ShortestPath {
    source: EntityId,
    target: EntityId,
    direction: Direction,
    max_depth: Option<usize>,
}

impl ShortestPath {
    /// Create a new shortest path finder.
    pub fn new(
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        direction: Direction,
    ) -> Self {
        Self { source: source.into(), target: target.into(), direction, max_depth: None }
    }

    /// Set the maximum path length to search.
    pub const fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Find one shortest path.
    ///
    /// Returns `None` if the target is unreachable within the constraints.
    pub fn find(&self, graph: &Graph) -> GraphResult<Option<PathResult>> {
        Ok(self.find_all(graph)?.into_iter().next())
    }

    /// Find every shortest path from source to target.
    ///
    /// Returns an empty list when no path exists. Unknown endpoints are an
    /// error.
    pub fn find_all(&self, graph: &Graph) -> GraphResult<Vec<PathResult>> {
        let source = resolve(graph, &self.source)?;
        let target = resolve(graph, &self.target)?;

        if source == target {
            return Ok(vec![PathResult::from_indices(graph, &[source])]);
        }

        // BFS recording every predecessor on a shortest route
        let n = graph.node_count();
        let mut dist: Vec<Option<usize>> = vec![None; n];
        let mut preds: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
        let mut queue = VecDeque::new();
        dist[source] = Some(0);
        queue.push_back(source);

        while let Some(v) = queue.pop_front() {
            let d = dist[v].unwrap_or(0);
            if let Some(found) = dist[target] {
                if d >= found {
                    break;
                }
            }
            if self.max_depth.is_some_and(|max| d >= max) {
                continue;
            }
            for w in graph.neighbors(v, self.direction) {
                match dist[w] {
                    None => {
                        dist[w] = Some(d + 1);
                        preds[w].push(v);
                        queue.push_back(w);
                    }
                    Some(dw) if dw == d + 1 => preds[w].push(v),
                    Some(_) => {}
                }
            }
        }

        if dist[target].is_none() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        let mut stack = vec![target];
        Self::unwind(graph, source, &preds, &mut stack, &mut paths);
        Ok(paths)
    }

    /// Enumerate predecessor chains from the current stack top back to the source.
    fn unwind(
        graph: &Graph,
        source: NodeIndex,
        preds: &[Vec<NodeIndex>],
        stack: &mut Vec<NodeIndex>,
        paths: &mut Vec<PathResult>,
    ) {
        let Some(&top) = stack.last() else { return };
        if top == source {
            let nodes: Vec<NodeIndex> = stack.iter().rev().copied().collect();
            paths.push(PathResult::from_indices(graph, &nodes));
            return;
        }
        for &p in &preds[top] {
            stack.push(p);
            Self::unwind(graph, source, preds, stack, paths);
            stack.pop();
        }
    }
}

/// BFS expansion from a single source.
///
/// Yields one shortest path per reachable node (the first discovered), in
/// discovery order, starting with the trivial path to the source itself.
#[derive(Debug, Clone)]
pub struct SingleSourceShortestPaths {
    source: EntityId,
    direction: Direction,
    cutoff: Option<usize>,
}

impl SingleSourceShortestPaths {
    /// Create a new expansion from `source`.
    pub fn new(source: impl Into<EntityId>, direction: Direction) -> Self {
        Self { source: source.into(), direction, cutoff: None }
    }

    /// Only report nodes within `cutoff` hops.
    pub const fn with_cutoff(mut self, cutoff: usize) -> Self {
        self.cutoff = Some(cutoff);
        self
    }

    /// Run the expansion.
    pub fn execute(&self, graph: &Graph) -> GraphResult<Vec<PathResult>> {
        let source = resolve(graph, &self.source)?;

        let mut parent: Vec<Option<NodeIndex>> = vec![None; graph.node_count()];
        let mut visited = vec![false; graph.node_count()];
        let mut order = vec![(source, 0usize)];
        let mut queue = VecDeque::from([(source, 0usize)]);
        visited[source] = true;

        while let Some((v, depth)) = queue.pop_front() {
            if self.cutoff.is_some_and(|c| depth >= c) {
                continue;
            }
            for w in graph.neighbors(v, self.direction) {
                if !visited[w] {
                    visited[w] = true;
                    parent[w] = Some(v);
                    order.push((w, depth + 1));
                    queue.push_back((w, depth + 1));
                }
            }
        }

        Ok(order
            .into_iter()
            .map(|(node, depth)| {
                let mut chain = Vec::with_capacity(depth + 1);
                let mut current = Some(node);
                while let Some(c) = current {
                    chain.push(c);
                    current = parent[c];
                }
                chain.reverse();
                PathResult::from_indices(graph, &chain)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use cognisgraph_core::{Entity, Relationship};

    use super::*;

    fn diamond() -> Graph {
        // a -> b -> d, a -> c -> d, d -> e
        Graph::from_parts(
            ["a", "b", "c", "d", "e"].map(|id| Entity::new(id, "Node")),
            [("a", "b"), ("a", "c"), ("b", "d"), ("c", "d"), ("d", "e")]
                .map(|(s, t)| Relationship::new(s, t, "link")),
        )
        .expect("valid graph")
    }

    fn ids(path: &PathResult) -> Vec<&str> {
        path.nodes.iter().map(EntityId::as_str).collect()
    }

    #[test]
    fn all_tied_shortest_paths() {
        let graph = diamond();
        let paths = ShortestPath::new("a", "d", Direction::Outgoing).find_all(&graph).expect("ok");
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.length == 2));
        let mut routes: Vec<_> = paths.iter().map(ids).collect();
        routes.sort();
        assert_eq!(routes, vec![vec!["a", "b", "d"], vec!["a", "c", "d"]]);
    }

    #[test]
    fn direction_matters() {
        let graph = diamond();
        let forward =
            ShortestPath::new("e", "a", Direction::Outgoing).find_all(&graph).expect("ok");
        assert!(forward.is_empty());
        let back = ShortestPath::new("e", "a", Direction::Incoming).find(&graph).expect("ok");
        assert_eq!(back.map(|p| p.length), Some(3));
    }

    #[test]
    fn max_depth_bounds_search() {
        let graph = diamond();
        let path = ShortestPath::new("a", "e", Direction::Outgoing)
            .with_max_depth(2)
            .find(&graph)
            .expect("ok");
        assert!(path.is_none());
    }

    #[test]
    fn unknown_endpoint_is_error() {
        let graph = diamond();
        let err = ShortestPath::new("a", "zzz", Direction::Outgoing).find_all(&graph);
        assert!(matches!(err, Err(GraphError::EntityNotFound(_))));
    }

    #[test]
    fn single_source_with_cutoff() {
        let graph = diamond();
        let paths = SingleSourceShortestPaths::new("a", Direction::Outgoing)
            .with_cutoff(2)
            .execute(&graph)
            .expect("ok");

        let targets: Vec<_> =
            paths.iter().filter_map(|p| p.target()).map(EntityId::as_str).collect();
        assert_eq!(targets, vec!["a", "b", "c", "d"]);
        assert_eq!(ids(&paths[3]), vec!["a", "b", "d"]);
        assert_eq!(paths[3].last_hop_source().map(EntityId::as_str), Some("b"));
        assert!(paths[0].is_empty());
    }
}
