//! Graph analytics algorithms.
//!
//! # Centrality Measures
//!
//! - [`DegreeCentrality`] - Fraction of the graph one hop away
//! - [`BetweennessCentrality`] - Brandes algorithm for bridge/bottleneck detection
//! - [`ClosenessCentrality`] - Distance-based centrality (standard and harmonic)
//! - [`EigenvectorCentrality`] - Importance based on links from important nodes
//! - [`PageRank`] - Random-surfer importance ranking
//!
//! # Community Detection
//!
//! - [`GreedyModularity`] - Agglomerative modularity maximization
//!
//! # Similarity
//!
//! - [`NeighborhoodSimilarity`] - Jaccard overlap of neighbor sets
//!
//! # Centrality Comparison
//!
//! | Algorithm | Measures | Time Complexity | Best For |
//! |-----------|----------|-----------------|----------|
//! | Degree | Direct connections | O(V + E) | Quick overview |
//! | Betweenness | Bridge nodes | O(V * E) | Finding bottlenecks |
//! | Closeness | Path distances | O(V * (V + E)) | Finding central hubs |
//! | Eigenvector | Recursive importance | O(E * iterations) | Influence networks |
//! | PageRank | Link importance | O(E * iterations) | Directed graphs, authority |
//!
//! Every algorithm rejects graphs above its `max_graph_nodes` limit with
//! [`GraphError::GraphTooLarge`](crate::store::GraphError::GraphTooLarge).

mod betweenness;
mod closeness;
mod degree;
mod eigenvector;
mod modularity;
mod pagerank;
mod scores;
mod similarity;

pub use betweenness::{
    BetweennessCentrality, BetweennessCentralityConfig, BetweennessCentralityResult,
};
pub use closeness::{ClosenessCentrality, ClosenessCentralityConfig, ClosenessCentralityResult};
pub use degree::{DegreeCentrality, DegreeCentralityConfig, DegreeCentralityResult};
pub use eigenvector::{
    EigenvectorCentrality, EigenvectorCentralityConfig, EigenvectorCentralityResult,
};
pub use modularity::{CommunityResult, GreedyModularity, GreedyModularityConfig};
pub use pagerank::{PageRank, PageRankConfig, PageRankResult, DEFAULT_MAX_GRAPH_NODES};
pub use scores::ScoreMap;
pub use similarity::{jaccard_similarity, NeighborhoodSimilarity, NeighborhoodSimilarityConfig};

use crate::store::{Graph, GraphError, GraphResult};

/// Reject graphs above `limit` before allocating per-node state.
fn check_graph_size(graph: &Graph, limit: Option<usize>) -> GraphResult<()> {
    if let Some(limit) = limit {
        let node_count = graph.node_count();
        if node_count > limit {
            return Err(GraphError::GraphTooLarge { node_count, limit });
        }
    }
    Ok(())
}
