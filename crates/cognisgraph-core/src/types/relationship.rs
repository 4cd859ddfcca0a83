//! Relationship (edge) types for the graph.

use serde::{Deserialize, Serialize};

use super::{EntityId, Properties, Value};
use crate::error::{CoreError, CoreResult};

/// Identity of a relationship.
///
/// Parallel relationships between the same pair are allowed as long as their
/// types differ, so identity is the `(source, target, type)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationshipKey {
    /// The source entity ID.
    pub source: EntityId,
    /// The target entity ID.
    pub target: EntityId,
    /// The relationship type.
    pub rel_type: String,
}

/// A directed relationship between two entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// The source entity ID.
    pub source: EntityId,
    /// The target entity ID.
    pub target: EntityId,
    /// The type of this relationship.
    #[serde(rename = "type")]
    pub rel_type: String,
    /// Properties stored on this relationship.
    #[serde(default)]
    pub properties: Properties,
}

impl Relationship {
    /// Create a new relationship between two entities.
    #[must_use]
    pub fn new(
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        rel_type: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            rel_type: rel_type.into(),
            properties: Properties::new(),
        }
    }

    /// Add a property to this relationship.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Get a property value by key.
    #[inline]
    #[must_use]
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// The identity triple of this relationship.
    #[must_use]
    pub fn key(&self) -> RelationshipKey {
        RelationshipKey {
            source: self.source.clone(),
            target: self.target.clone(),
            rel_type: self.rel_type.clone(),
        }
    }

    /// Check that both endpoints and the type tag are non-empty.
    pub fn validate(&self) -> CoreResult<()> {
        if self.source.as_str().is_empty() || self.target.as_str().is_empty() {
            return Err(CoreError::Validation(format!(
                "relationship '{}' has an empty endpoint",
                self.rel_type
            )));
        }
        if self.rel_type.is_empty() {
            return Err(CoreError::Validation(format!(
                "relationship {} -> {} has an empty type",
                self.source, self.target
            )));
        }
        Ok(())
    }

    /// Returns `true` if `id` is either endpoint.
    #[must_use]
    pub fn touches(&self, id: &str) -> bool {
        self.source.as_str() == id || self.target.as_str() == id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationship_creation() {
        let rel = Relationship::new("alice", "acme", "works_at").with_property("since", 2020i64);

        assert_eq!(rel.source.as_str(), "alice");
        assert_eq!(rel.target.as_str(), "acme");
        assert_eq!(rel.rel_type, "works_at");
        assert_eq!(rel.get_property("since"), Some(&Value::Int(2020)));
        assert!(rel.touches("acme"));
        assert!(!rel.touches("bob"));
    }

    #[test]
    fn key_distinguishes_types() {
        let a = Relationship::new("x", "y", "uses").key();
        let b = Relationship::new("x", "y", "depends_on").key();
        assert_ne!(a, b);
    }
}
