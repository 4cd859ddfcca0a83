//! Entity (node) types for the graph.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{EntityId, Value};
use crate::error::{CoreError, CoreResult};

/// Ordered property map shared by entities and relationships.
pub type Properties = BTreeMap<String, Value>;

/// An entity (node) in the knowledge graph.
///
/// Entities are extracted from documents. Each one has:
/// - A unique identifier
/// - A type tag (e.g. `Person`, `Technology`)
/// - Properties as an ordered key-value map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier for this entity.
    pub id: EntityId,
    /// Type tag of this entity.
    #[serde(rename = "type")]
    pub entity_type: String,
    /// Properties stored on this entity.
    #[serde(default)]
    pub properties: Properties,
}

impl Entity {
    /// Create a new entity with the given ID and type.
    #[must_use]
    pub fn new(id: impl Into<EntityId>, entity_type: impl Into<String>) -> Self {
        Self { id: id.into(), entity_type: entity_type.into(), properties: Properties::new() }
    }

    /// Add a property to this entity.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Get a property value by key.
    #[must_use]
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Set a property value.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Check that the identifier and type tag are non-empty.
    pub fn validate(&self) -> CoreResult<()> {
        if self.id.as_str().is_empty() {
            return Err(CoreError::Validation("entity id must not be empty".to_owned()));
        }
        if self.entity_type.is_empty() {
            return Err(CoreError::Validation(format!("entity '{}' has an empty type", self.id)));
        }
        Ok(())
    }

    /// Iterate over the scalar-valued properties only.
    pub fn scalar_properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().filter(|(_, v)| v.is_scalar()).map(|(k, v)| (k.as_str(), v))
    }
}
