//! Depth-first enumeration of simple (cycle-free) paths.

use cognisgraph_core::EntityId;

use super::{Direction, PathResult};
use crate::store::{Graph, GraphError, GraphResult, NodeIndex};

/// Enumerates every simple path between two nodes up to a length cutoff.
///
/// Paths are produced in depth-first order following neighbor insertion
/// order. The number of simple paths grows combinatorially with the cutoff,
/// so callers working on dense graphs should also set a result limit.
///
/// # Example
///
/// ```ignore
/// let paths = SimplePaths::new("a", "d", 4).execute(&graph)?;
/// ```
#[derive(Debug, Clone)]
pub struct SimplePaths {
    source: EntityId,
    target: EntityId,
    cutoff: usize,
    direction: Direction,
    limit: Option<usize>,
}

impl SimplePaths {
    /// Paths from `source` to `target` with at most `cutoff` edges.
    pub fn new(source: impl Into<EntityId>, target: impl Into<EntityId>, cutoff: usize) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            cutoff,
            direction: Direction::Outgoing,
            limit: None,
        }
    }

    /// Set the traversal direction.
    pub const fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Stop after this many paths.
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Run the enumeration.
    ///
    /// A path from a node to itself is never reported.
    pub fn execute(&self, graph: &Graph) -> GraphResult<Vec<PathResult>> {
        let source = graph
            .index_of(self.source.as_str())
            .ok_or_else(|| GraphError::EntityNotFound(self.source.clone()))?;
        let target = graph
            .index_of(self.target.as_str())
            .ok_or_else(|| GraphError::EntityNotFound(self.target.clone()))?;

        let mut paths = Vec::new();
        if source == target || self.cutoff == 0 {
            return Ok(paths);
        }

        let mut on_path = vec![false; graph.node_count()];
        let mut stack = vec![source];
        on_path[source] = true;
        self.visit(graph, target, &mut stack, &mut on_path, &mut paths);
        Ok(paths)
    }

    fn visit(
        &self,
        graph: &Graph,
        target: NodeIndex,
        stack: &mut Vec<NodeIndex>,
        on_path: &mut [bool],
        paths: &mut Vec<PathResult>,
    ) {
        let Some(&current) = stack.last() else { return };
        for next in graph.neighbors(current, self.direction) {
            if self.limit.is_some_and(|l| paths.len() >= l) {
                return;
            }
            if on_path[next] {
                continue;
            }
            if next == target {
                stack.push(next);
                paths.push(PathResult::from_indices(graph, stack));
                stack.pop();
                continue;
            }
            // stack holds edges + 1 nodes; one more hop must still fit
            if stack.len() < self.cutoff {
                on_path[next] = true;
                stack.push(next);
                self.visit(graph, target, stack, on_path, paths);
                stack.pop();
                on_path[next] = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use cognisgraph_core::{Entity, Relationship};

    use super::*;

    fn ladder() -> Graph {
        // a -> b -> c -> d, a -> c, b -> d, d -> a
        Graph::from_parts(
            ["a", "b", "c", "d"].map(|id| Entity::new(id, "Node")),
            [("a", "b"), ("b", "c"), ("c", "d"), ("a", "c"), ("b", "d"), ("d", "a")]
                .map(|(s, t)| Relationship::new(s, t, "next")),
        )
        .expect("valid graph")
    }

    #[test]
    fn enumerates_all_simple_paths() {
        let graph = ladder();
        let paths = SimplePaths::new("a", "d", 4).execute(&graph).expect("ok");
        let mut lengths: Vec<_> = paths.iter().map(|p| p.length).collect();
        lengths.sort_unstable();
        // a-b-d, a-c-d, a-b-c-d
        assert_eq!(lengths, vec![2, 2, 3]);
    }

    #[test]
    fn cutoff_limits_length() {
        let graph = ladder();
        let paths = SimplePaths::new("a", "d", 2).execute(&graph).expect("ok");
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.length <= 2));
    }

    #[test]
    fn limit_caps_results() {
        let graph = ladder();
        let paths = SimplePaths::new("a", "d", 4).with_limit(1).execute(&graph).expect("ok");
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn same_endpoint_yields_nothing() {
        let graph = ladder();
        assert!(SimplePaths::new("a", "a", 4).execute(&graph).expect("ok").is_empty());
    }

    #[test]
    fn unreachable_is_empty_not_error() {
        let mut graph = ladder();
        graph.insert_entity(Entity::new("island", "Node")).expect("add");
        assert!(SimplePaths::new("a", "island", 4).execute(&graph).expect("ok").is_empty());
    }
}
