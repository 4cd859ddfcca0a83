//! Community membership and role classification.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use cognisgraph_core::EntityId;
use cognisgraph_graph::analytics::{CommunityResult, GreedyModularity, GreedyModularityConfig};
use cognisgraph_graph::{Direction, Graph};
use serde::{Deserialize, Serialize};

use crate::error::XaiResult;

/// A node's role inside its community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommunityRole {
    /// Linked to more than 80% of its community.
    Hub,
    /// More than 50%.
    Connector,
    /// More than 20%.
    Member,
    /// 20% or less.
    Peripheral,
    /// Alone in its community.
    Isolated,
}

impl CommunityRole {
    /// Classify by the fraction of the rest of the community a node links to.
    pub fn from_density(density: f64) -> Self {
        if density > 0.8 {
            Self::Hub
        } else if density > 0.5 {
            Self::Connector
        } else if density > 0.2 {
            Self::Member
        } else {
            Self::Peripheral
        }
    }
}

impl fmt::Display for CommunityRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hub => "Hub",
            Self::Connector => "Connector",
            Self::Member => "Member",
            Self::Peripheral => "Peripheral",
            Self::Isolated => "Isolated",
        };
        f.write_str(name)
    }
}

/// Where a node sits in the community structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    /// Community index, only meaningful within one analysis.
    pub community_id: usize,
    /// The node's role.
    pub role: CommunityRole,
    /// Number of members, at least 1.
    pub community_size: usize,
}

fn classify(graph: &Graph, node: &str, members: &[EntityId]) -> CommunityRole {
    if members.len() <= 1 {
        return CommunityRole::Isolated;
    }
    let Some(idx) = graph.index_of(node) else {
        return CommunityRole::Isolated;
    };
    let member_set: HashSet<&str> = members.iter().map(EntityId::as_str).collect();
    let inside = graph
        .neighbors(idx, Direction::Both)
        .into_iter()
        .filter(|&n| member_set.contains(graph.id_at(n).as_str()))
        .count();
    CommunityRole::from_density(inside as f64 / (members.len() - 1) as f64)
}

fn roles_from(
    graph: &Graph,
    communities: &CommunityResult,
    targets: &[EntityId],
) -> BTreeMap<EntityId, RoleRecord> {
    targets
        .iter()
        .filter_map(|node| {
            let community_id = communities.community_of(node.as_str())?;
            let members = communities.members(community_id);
            Some((
                node.clone(),
                RoleRecord {
                    community_id,
                    role: classify(graph, node.as_str(), members),
                    community_size: members.len(),
                },
            ))
        })
        .collect()
}

/// Detect communities over the whole graph and classify each target.
pub fn analyze_roles(
    graph: &Graph,
    targets: &[EntityId],
    config: &GreedyModularityConfig,
) -> XaiResult<BTreeMap<EntityId, RoleRecord>> {
    let communities = GreedyModularity::detect(graph, config)?;
    Ok(roles_from(graph, &communities, targets))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_thresholds() {
        assert_eq!(CommunityRole::from_density(1.0), CommunityRole::Hub);
        assert_eq!(CommunityRole::from_density(0.8), CommunityRole::Connector);
        assert_eq!(CommunityRole::from_density(0.5), CommunityRole::Member);
        assert_eq!(CommunityRole::from_density(0.2), CommunityRole::Peripheral);
        assert_eq!(CommunityRole::from_density(0.0), CommunityRole::Peripheral);
    }

    #[test]
    fn role_serializes_as_label() {
        let json = serde_json::to_string(&CommunityRole::Isolated).expect("serialize");
        assert_eq!(json, "\"Isolated\"");
        assert_eq!(CommunityRole::Hub.to_string(), "Hub");
    }
}
