//! Shortest-path importance between pairs of target nodes.

use std::collections::{BTreeMap, HashSet};

use cognisgraph_core::EntityId;
use cognisgraph_graph::traversal::ShortestPath;
use cognisgraph_graph::{Direction, Graph, GraphResult, PathResult};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Paths beyond this count no longer raise the path-count factor.
const SATURATING_PATH_COUNT: f64 = 5.0;

/// The shortest paths joining one pair of nodes and their importance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathImportance {
    /// Every shortest path in either direction, deduplicated.
    pub paths: Vec<Vec<EntityId>>,
    /// Importance in [0, 1].
    pub importance: f64,
}

/// Key under which a pair is stored.
pub fn pair_key(a: &str, b: &str) -> String {
    format!("{a}-{b}")
}

/// Importance of a set of paths.
///
/// Each path contributes `1 / (edges + 1)`. The mean contribution is scaled
/// by `min(1, paths / 5)` and by `1 / (mean edges + 1)`.
pub fn path_set_importance(paths: &[PathResult]) -> f64 {
    if paths.is_empty() {
        return 0.0;
    }
    let count = paths.len() as f64;
    let total: f64 = paths.iter().map(|p| 1.0 / (p.length as f64 + 1.0)).sum();
    let mean_length = paths.iter().map(|p| p.length as f64).sum::<f64>() / count;
    let count_factor = (count / SATURATING_PATH_COUNT).min(1.0);
    let length_factor = 1.0 / (mean_length + 1.0);
    ((total / count) * count_factor * length_factor).clamp(0.0, 1.0)
}

fn pair_paths(graph: &Graph, a: &EntityId, b: &EntityId) -> GraphResult<Vec<PathResult>> {
    let mut seen = HashSet::new();
    let mut paths = Vec::new();
    for (from, to) in [(a, b), (b, a)] {
        let search = ShortestPath::new(from.clone(), to.clone(), Direction::Outgoing);
        for path in search.find_all(graph)? {
            if seen.insert(path.clone()) {
                paths.push(path);
            }
        }
    }
    Ok(paths)
}

/// Path importance for every unordered pair of `targets`.
///
/// Pairs with no path in either direction are omitted. Each result is
/// stored under both `"a-b"` and `"b-a"`. A pair that fails is logged and
/// skipped.
pub fn analyze_paths(graph: &Graph, targets: &[EntityId]) -> BTreeMap<String, PathImportance> {
    let mut out = BTreeMap::new();
    for (i, a) in targets.iter().enumerate() {
        for b in &targets[i + 1..] {
            let paths = match pair_paths(graph, a, b) {
                Ok(paths) => paths,
                Err(e) => {
                    error!(source = %a, target = %b, error = %e, "path importance failed for pair");
                    continue;
                }
            };
            if paths.is_empty() {
                continue;
            }
            let record = PathImportance {
                importance: path_set_importance(&paths),
                paths: paths.into_iter().map(|p| p.nodes).collect(),
            };
            out.insert(pair_key(b.as_str(), a.as_str()), record.clone());
            out.insert(pair_key(a.as_str(), b.as_str()), record);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(ids: &[&str]) -> PathResult {
        PathResult::new(ids.iter().map(|&id| EntityId::from(id)).collect())
    }

    #[test]
    fn single_direct_path() {
        // (1/2) * (1/5) * (1/2)
        let importance = path_set_importance(&[path(&["a", "b"])]);
        assert!((importance - 0.05).abs() < 1e-12);
    }

    #[test]
    fn more_paths_raise_importance() {
        let one = path_set_importance(&[path(&["a", "b"])]);
        let two = path_set_importance(&[path(&["a", "b"]), path(&["b", "a"])]);
        assert!(two > one);
    }

    #[test]
    fn longer_paths_lower_importance() {
        let short = path_set_importance(&[path(&["a", "b"])]);
        let long = path_set_importance(&[path(&["a", "x", "b"])]);
        assert!(long < short);
        assert!(path_set_importance(&[]).abs() < f64::EPSILON);
    }
}
