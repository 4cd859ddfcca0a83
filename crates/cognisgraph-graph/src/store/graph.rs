//! Immutable-by-convention graph snapshot with index-based adjacency.

use std::collections::{HashMap, HashSet};

use cognisgraph_core::{Entity, EntityId, Relationship, RelationshipKey};

use super::{GraphError, GraphResult};
use crate::traversal::Direction;

/// Dense index of a node inside one [`Graph`] snapshot.
///
/// Indices follow entity insertion order and are only meaningful for the
/// snapshot that produced them.
pub type NodeIndex = usize;

/// A directed property graph of entities and typed relationships.
///
/// Adjacency is kept twice: per-node relationship lists (so every parallel
/// typed relationship is visible) and per-node distinct neighbor lists (what
/// the analytics algorithms walk).
#[derive(Debug, Clone, Default)]
pub struct Graph {
    entities: Vec<Entity>,
    index: HashMap<EntityId, NodeIndex>,
    relationships: Vec<Relationship>,
    keys: HashSet<RelationshipKey>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
    successors: Vec<Vec<NodeIndex>>,
    predecessors: Vec<Vec<NodeIndex>>,
}

impl Graph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from entities and relationships.
    ///
    /// Fails on the first duplicate entity, duplicate relationship, or
    /// relationship whose endpoint is unknown.
    pub fn from_parts(
        entities: impl IntoIterator<Item = Entity>,
        relationships: impl IntoIterator<Item = Relationship>,
    ) -> GraphResult<Self> {
        let mut graph = Self::new();
        for entity in entities {
            graph.insert_entity(entity)?;
        }
        for relationship in relationships {
            graph.insert_relationship(relationship)?;
        }
        Ok(graph)
    }

    /// Check that `entity` could be inserted, without touching the graph.
    pub fn check_entity(&self, entity: &Entity) -> GraphResult<()> {
        entity.validate()?;
        if self.index.contains_key(&entity.id) {
            return Err(GraphError::EntityAlreadyExists(entity.id.clone()));
        }
        Ok(())
    }

    /// Add an entity.
    pub fn insert_entity(&mut self, entity: Entity) -> GraphResult<NodeIndex> {
        self.check_entity(&entity)?;

        let idx = self.entities.len();
        self.index.insert(entity.id.clone(), idx);
        self.entities.push(entity);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        self.successors.push(Vec::new());
        self.predecessors.push(Vec::new());
        Ok(idx)
    }

    /// Check that `relationship` could be inserted, without touching the
    /// graph. Returns the endpoint indices and the identity key.
    pub fn check_relationship(
        &self,
        relationship: &Relationship,
    ) -> GraphResult<(NodeIndex, NodeIndex, RelationshipKey)> {
        relationship.validate()?;
        let source = self
            .index_of(relationship.source.as_str())
            .ok_or_else(|| GraphError::InvalidEntityReference(relationship.source.clone()))?;
        let target = self
            .index_of(relationship.target.as_str())
            .ok_or_else(|| GraphError::InvalidEntityReference(relationship.target.clone()))?;

        let key = relationship.key();
        if self.keys.contains(&key) {
            return Err(GraphError::RelationshipAlreadyExists {
                from: key.source,
                to: key.target,
                rel_type: key.rel_type,
            });
        }
        Ok((source, target, key))
    }

    /// Add a relationship between two existing entities.
    pub fn insert_relationship(&mut self, relationship: Relationship) -> GraphResult<()> {
        let (source, target, key) = self.check_relationship(&relationship)?;

        let rel_idx = self.relationships.len();
        self.keys.insert(key);
        self.relationships.push(relationship);
        self.outgoing[source].push(rel_idx);
        self.incoming[target].push(rel_idx);
        if !self.successors[source].contains(&target) {
            self.successors[source].push(target);
            self.predecessors[target].push(source);
        }
        Ok(())
    }

    /// Number of entities.
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of relationships, counting parallel typed relationships separately.
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.relationships.len()
    }

    /// Returns `true` if the graph has no entities.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns `true` if an entity with this ID exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Dense index of an entity.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Look up an entity by ID.
    #[must_use]
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.index_of(id).map(|idx| &self.entities[idx])
    }

    /// The entity at a dense index.
    ///
    /// Indices must come from this snapshot.
    #[inline]
    #[must_use]
    pub fn entity_at(&self, idx: NodeIndex) -> &Entity {
        &self.entities[idx]
    }

    /// The ID of the entity at a dense index.
    #[inline]
    #[must_use]
    pub fn id_at(&self, idx: NodeIndex) -> &EntityId {
        &self.entities[idx].id
    }

    /// All entities in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// All relationships in insertion order.
    #[must_use]
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Distinct targets of outgoing relationships.
    #[inline]
    #[must_use]
    pub fn successors(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.successors[idx]
    }

    /// Distinct sources of incoming relationships.
    #[inline]
    #[must_use]
    pub fn predecessors(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.predecessors[idx]
    }

    /// Distinct neighbors in the given direction, self excluded for `Both`.
    ///
    /// `Both` lists successors first, then predecessors that are not also
    /// successors.
    #[must_use]
    pub fn neighbors(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        match direction {
            Direction::Outgoing => self.successors[idx].clone(),
            Direction::Incoming => self.predecessors[idx].clone(),
            Direction::Both => {
                let mut seen: HashSet<NodeIndex> = HashSet::new();
                self.successors[idx]
                    .iter()
                    .chain(&self.predecessors[idx])
                    .copied()
                    .filter(|&n| n != idx && seen.insert(n))
                    .collect()
            }
        }
    }

    /// In-degree plus out-degree over all relationships.
    #[must_use]
    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.outgoing[idx].len() + self.incoming[idx].len()
    }

    /// Outgoing relationships of a node.
    pub fn outgoing_relationships(&self, idx: NodeIndex) -> impl Iterator<Item = &Relationship> {
        self.outgoing[idx].iter().map(|&r| &self.relationships[r])
    }

    /// Incoming relationships of a node.
    pub fn incoming_relationships(&self, idx: NodeIndex) -> impl Iterator<Item = &Relationship> {
        self.incoming[idx].iter().map(|&r| &self.relationships[r])
    }

    /// Relationships from `source` to `target`, in insertion order.
    pub fn relationships_between(
        &self,
        source: NodeIndex,
        target: NodeIndex,
    ) -> impl Iterator<Item = &Relationship> {
        let target_id = &self.entities[target].id;
        self.outgoing_relationships(source).filter(move |r| &r.target == target_id)
    }

    /// The first relationship inserted from `source` to `target`.
    #[must_use]
    pub fn first_relationship(
        &self,
        source: NodeIndex,
        target: NodeIndex,
    ) -> Option<&Relationship> {
        self.relationships_between(source, target).next()
    }

    /// Distinct relationship types in first-seen order.
    #[must_use]
    pub fn relationship_types(&self) -> Vec<&str> {
        let mut seen: HashSet<&str> = HashSet::new();
        self.relationships
            .iter()
            .map(|r| r.rel_type.as_str())
            .filter(|t| seen.insert(*t))
            .collect()
    }

    /// Number of relationships carrying a type.
    #[must_use]
    pub fn count_of_type(&self, rel_type: &str) -> usize {
        self.relationships.iter().filter(|r| r.rel_type == rel_type).count()
    }

    /// Induced subgraph over a node set.
    ///
    /// Entities keep their relative insertion order; relationships are kept
    /// when both endpoints are in the set.
    #[must_use]
    pub fn induced_subgraph(&self, nodes: &HashSet<NodeIndex>) -> Self {
        let mut sub = Self::new();
        for (idx, entity) in self.entities.iter().enumerate() {
            if nodes.contains(&idx) {
                // Source graph already guarantees unique, valid entities.
                let _ = sub.insert_entity(entity.clone());
            }
        }
        for relationship in &self.relationships {
            if sub.contains(relationship.source.as_str())
                && sub.contains(relationship.target.as_str())
            {
                let _ = sub.insert_relationship(relationship.clone());
            }
        }
        sub
    }
}
