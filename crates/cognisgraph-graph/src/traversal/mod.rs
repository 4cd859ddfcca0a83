//! Graph traversal algorithms.
//!
//! - [`ShortestPath`] - BFS shortest path finding, including every tied path
//! - [`SingleSourceShortestPaths`] - BFS expansion from one node with a hop cutoff
//! - [`SimplePaths`] - Depth-first enumeration of cycle-free paths
//!
//! # Direction
//!
//! All traversal operations support three directions:
//!
//! - [`Direction::Outgoing`] - Follow edges from source to target
//! - [`Direction::Incoming`] - Follow edges from target to source
//! - [`Direction::Both`] - Follow edges in both directions
//!
//! Parallel relationships of different types collapse to one hop; traversal
//! walks distinct neighbors.

mod shortest_path;
mod simple_paths;

pub use shortest_path::{PathResult, ShortestPath, SingleSourceShortestPaths};
pub use simple_paths::SimplePaths;

use serde::{Deserialize, Serialize};

/// Direction for edge traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Follow outgoing edges (source -> target).
    #[default]
    Outgoing,

    /// Follow incoming edges (target <- source).
    Incoming,

    /// Follow edges in both directions.
    Both,
}

impl Direction {
    /// Returns true if this direction includes outgoing edges.
    #[inline]
    pub const fn includes_outgoing(self) -> bool {
        matches!(self, Self::Outgoing | Self::Both)
    }

    /// Returns true if this direction includes incoming edges.
    #[inline]
    pub const fn includes_incoming(self) -> bool {
        matches!(self, Self::Incoming | Self::Both)
    }

    /// The opposite direction; `Both` stays `Both`.
    #[inline]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Outgoing => Self::Incoming,
            Self::Incoming => Self::Outgoing,
            Self::Both => Self::Both,
        }
    }
}
