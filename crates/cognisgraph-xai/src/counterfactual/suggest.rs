//! Coarse change proposals.
//!
//! Nothing here re-runs a query or checks that a change would flip the
//! outcome. Every suggestion is marked unverified.

use cognisgraph_core::{EntityId, Value};
use cognisgraph_graph::Graph;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::CounterfactualExplainer;
use crate::query::{Evidence, QueryResult};

/// A single graph edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "change_type", rename_all = "snake_case")]
pub enum ProposedChange {
    /// Delete a relationship.
    RemoveEdge {
        /// Source entity.
        source: EntityId,
        /// Target entity.
        target: EntityId,
        /// Relationship type.
        #[serde(rename = "type")]
        rel_type: String,
    },
    /// Alter a property value.
    ChangeProperty {
        /// The entity carrying the property.
        entity: EntityId,
        /// Property key.
        property: String,
        /// Value before the change, if the property is set.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current_value: Option<Value>,
    },
}

impl ProposedChange {
    /// Expected effect of the edit, in words.
    pub const fn impact(&self) -> &'static str {
        match self {
            Self::RemoveEdge { .. } => "Removing this edge might disconnect key evidence.",
            Self::ChangeProperty { .. } => "Changing this property might alter entity relevance.",
        }
    }
}

/// A proposed change and what it might do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterfactualSuggestion {
    /// The edit.
    pub change: ProposedChange,
    /// Expected effect, in words.
    pub impact: String,
    /// The outcome the caller asked for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_outcome: Option<String>,
    /// Always `false`: the change was never tested.
    pub verified: bool,
}

impl CounterfactualExplainer {
    /// Up to `max_suggestions` edits that might turn `original_result` into
    /// `target_result`.
    ///
    /// Cited relationships become edge removals and cited entities become
    /// property changes. A result without evidence gets generic proposals
    /// built from the involved entities' own relationships and properties.
    pub fn suggest(
        &self,
        original_query: &str,
        original_result: &QueryResult,
        target_result: &QueryResult,
        max_suggestions: usize,
    ) -> Vec<CounterfactualSuggestion> {
        warn!(query = original_query, "counterfactual suggestions are heuristic and unverified");
        let target_outcome = target_result.answer.clone();

        let changes = if original_result.evidence.is_empty() {
            self.generic_changes(original_result)
        } else {
            self.evidence_changes(original_result)
        };

        let suggestions: Vec<_> = changes
            .into_iter()
            .take(max_suggestions)
            .map(|change| CounterfactualSuggestion {
                impact: change.impact().to_owned(),
                change,
                target_outcome: target_outcome.clone(),
                verified: false,
            })
            .collect();
        info!(count = suggestions.len(), "generated counterfactual suggestions");
        suggestions
    }

    fn evidence_changes(&self, result: &QueryResult) -> Vec<ProposedChange> {
        result
            .evidence
            .iter()
            .flat_map(|item| match item {
                Evidence::Relationship { source, target, rel_type } => {
                    vec![ProposedChange::RemoveEdge {
                        source: source.clone(),
                        target: target.clone(),
                        rel_type: rel_type.clone(),
                    }]
                }
                Evidence::Entity { id } => self.property_changes(id),
            })
            .collect()
    }

    fn generic_changes(&self, result: &QueryResult) -> Vec<ProposedChange> {
        let graph: &Graph = self.graph.as_ref();
        let involved = result.involved_entities();
        let edges = involved
            .iter()
            .filter_map(|id| graph.index_of(id.as_str()))
            .flat_map(move |idx| {
                graph.outgoing_relationships(idx).map(|r| ProposedChange::RemoveEdge {
                    source: r.source.clone(),
                    target: r.target.clone(),
                    rel_type: r.rel_type.clone(),
                })
            });
        let properties = involved.iter().flat_map(|id| self.property_changes(id));
        edges.chain(properties).collect()
    }

    fn property_changes(&self, id: &EntityId) -> Vec<ProposedChange> {
        self.graph
            .entity(id.as_str())
            .map(|entity| {
                entity
                    .scalar_properties()
                    .map(|(key, value)| ProposedChange::ChangeProperty {
                        entity: id.clone(),
                        property: key.to_owned(),
                        current_value: Some(value.clone()),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
