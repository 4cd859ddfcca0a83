//! Query results handed to the engine by the query layer.

use std::collections::HashSet;

use cognisgraph_core::EntityId;
use serde::{Deserialize, Serialize};

/// Outcome reported by the query layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    /// The query produced an answer.
    #[default]
    Success,
    /// The query failed; `QueryResult::error` says why.
    Error,
}

/// One piece of support cited by a query answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Evidence {
    /// An entity cited directly.
    Entity {
        /// The cited entity.
        id: EntityId,
    },
    /// A relationship cited by its endpoints and type.
    Relationship {
        /// Source entity.
        source: EntityId,
        /// Target entity.
        target: EntityId,
        /// Relationship type.
        #[serde(rename = "type")]
        rel_type: String,
    },
}

/// A natural-language query together with its answer and evidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// The question asked.
    #[serde(default)]
    pub query: String,
    /// Whether the query succeeded.
    #[serde(default)]
    pub status: QueryStatus,
    /// Failure message when `status` is `Error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Synthesized answer text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// Entities listed in the result payload.
    #[serde(default)]
    pub entities: Vec<EntityId>,
    /// Cited evidence.
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

impl QueryResult {
    /// A successful result for `query`.
    pub fn success(query: impl Into<String>) -> Self {
        Self { query: query.into(), ..Self::default() }
    }

    /// A failed result carrying `message`.
    pub fn failure(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            status: QueryStatus::Error,
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Set the answer text.
    #[must_use]
    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self
    }

    /// List an entity in the result payload.
    #[must_use]
    pub fn with_entity(mut self, id: impl Into<EntityId>) -> Self {
        self.entities.push(id.into());
        self
    }

    /// Cite an entity as evidence.
    #[must_use]
    pub fn with_entity_evidence(mut self, id: impl Into<EntityId>) -> Self {
        self.evidence.push(Evidence::Entity { id: id.into() });
        self
    }

    /// Cite a relationship as evidence.
    #[must_use]
    pub fn with_relationship_evidence(
        mut self,
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        rel_type: impl Into<String>,
    ) -> Self {
        self.evidence.push(Evidence::Relationship {
            source: source.into(),
            target: target.into(),
            rel_type: rel_type.into(),
        });
        self
    }

    /// Returns `true` if the result carries nothing at all.
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
            && self.answer.is_none()
            && self.entities.is_empty()
            && self.evidence.is_empty()
    }

    /// Every entity the result touches, deduplicated in first-seen order.
    ///
    /// Payload entities come first, then evidence: cited entities directly
    /// and both endpoints of cited relationships. Empty IDs are skipped.
    pub fn involved_entities(&self) -> Vec<EntityId> {
        let mut seen: HashSet<&EntityId> = HashSet::new();
        let evidence_ids = self.evidence.iter().flat_map(|item| match item {
            Evidence::Entity { id } => vec![id],
            Evidence::Relationship { source, target, .. } => vec![source, target],
        });
        self.entities
            .iter()
            .chain(evidence_ids)
            .filter(|id| !id.as_str().is_empty() && seen.insert(*id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn involved_entities_dedupes_in_order() {
        let result = QueryResult::success("what uses rust?")
            .with_entity("rust")
            .with_entity_evidence("cargo")
            .with_relationship_evidence("cargo", "rust", "built_with")
            .with_relationship_evidence("serde", "rust", "built_with");

        let ids: Vec<_> = result.involved_entities().iter().map(|id| id.to_string()).collect();
        assert_eq!(ids, vec!["rust", "cargo", "serde"]);
    }

    #[test]
    fn empty_detection() {
        assert!(QueryResult::default().is_empty());
        assert!(!QueryResult::success("q").is_empty());
    }

    #[test]
    fn evidence_json_shape() {
        let json = r#"{
            "query": "q",
            "status": "success",
            "evidence": [
                {"kind": "entity", "id": "a"},
                {"kind": "relationship", "source": "a", "target": "b", "type": "uses"}
            ]
        }"#;
        let result: QueryResult = serde_json::from_str(json).expect("valid json");
        assert_eq!(result.evidence.len(), 2);
        assert_eq!(result.involved_entities().len(), 2);
        assert_eq!(result.status, QueryStatus::Success);
    }
}
