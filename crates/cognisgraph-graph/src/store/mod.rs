//! Graph storage.
//!
//! - [`Graph`] - A snapshot with dense-index adjacency
//! - [`KnowledgeStore`] - Shared handle that publishes snapshots

mod error;
mod graph;
mod knowledge;

pub use error::{GraphError, GraphResult};
pub use graph::{Graph, NodeIndex};
pub use knowledge::KnowledgeStore;
