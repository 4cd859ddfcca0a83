//! Shared handle over the current graph snapshot.

use std::sync::{Arc, PoisonError, RwLock};

use cognisgraph_core::{Entity, Relationship};
use tracing::debug;

use super::{Graph, GraphResult};

/// The knowledge store: a cloneable handle to the live graph.
///
/// Readers take an `Arc<Graph>` snapshot and keep it as long as they like.
/// Writers install a new snapshot (copy-on-write), so a reader holding an
/// older snapshot never observes a partial update. Readers that want the
/// latest data must take a fresh snapshot.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeStore {
    current: Arc<RwLock<Arc<Graph>>>,
}

impl KnowledgeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with an existing graph.
    #[must_use]
    pub fn from_graph(graph: Graph) -> Self {
        Self { current: Arc::new(RwLock::new(Arc::new(graph))) }
    }

    /// The current graph snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Graph> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Add an entity, publishing a new snapshot.
    pub fn add_entity(&self, entity: Entity) -> GraphResult<()> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        debug!(entity = %entity.id, entity_type = %entity.entity_type, "adding entity");
        // A rejected write must leave the published snapshot untouched.
        guard.check_entity(&entity)?;
        Arc::make_mut(&mut guard).insert_entity(entity).map(|_| ())
    }

    /// Add a relationship, publishing a new snapshot.
    pub fn add_relationship(&self, relationship: Relationship) -> GraphResult<()> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        debug!(
            source = %relationship.source,
            target = %relationship.target,
            rel_type = %relationship.rel_type,
            "adding relationship"
        );
        guard.check_relationship(&relationship)?;
        Arc::make_mut(&mut guard).insert_relationship(relationship)
    }

    /// Returns `true` if the current snapshot contains the entity.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.snapshot().contains(id)
    }

    /// Look up an entity in the current snapshot.
    #[must_use]
    pub fn get_entity(&self, id: &str) -> Option<Entity> {
        self.snapshot().entity(id).cloned()
    }

    /// All relationships touching an entity, in insertion order.
    #[must_use]
    pub fn get_relationships(&self, id: &str) -> Vec<Relationship> {
        self.snapshot().relationships().iter().filter(|r| r.touches(id)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::GraphError;

    #[test]
    fn writes_do_not_disturb_held_snapshots() {
        let store = KnowledgeStore::new();
        store.add_entity(Entity::new("a", "Tool")).expect("add a");
        let before = store.snapshot();

        store.add_entity(Entity::new("b", "Tool")).expect("add b");
        store.add_relationship(Relationship::new("a", "b", "uses")).expect("add rel");

        assert_eq!(before.node_count(), 1);
        assert_eq!(store.snapshot().node_count(), 2);
        assert!(!Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn rejected_writes_keep_the_snapshot() {
        let store = KnowledgeStore::new();
        store.add_entity(Entity::new("a", "Tool")).expect("add a");
        store.add_entity(Entity::new("b", "Tool")).expect("add b");
        store.add_relationship(Relationship::new("a", "b", "uses")).expect("add rel");
        let before = store.snapshot();

        assert!(matches!(
            store.add_entity(Entity::new("a", "Tool")),
            Err(GraphError::EntityAlreadyExists(_))
        ));
        assert!(matches!(
            store.add_relationship(Relationship::new("a", "ghost", "uses")),
            Err(GraphError::InvalidEntityReference(_))
        ));
        assert!(matches!(
            store.add_relationship(Relationship::new("a", "b", "uses")),
            Err(GraphError::RelationshipAlreadyExists { .. })
        ));

        assert!(Arc::ptr_eq(&before, &store.snapshot()));
        assert_eq!(store.snapshot().relationships().len(), 1);
    }

    #[test]
    fn clones_share_state() {
        let store = KnowledgeStore::new();
        let handle = store.clone();
        handle.add_entity(Entity::new("a", "Tool")).expect("add");
        assert!(store.contains("a"));
        assert_eq!(store.get_entity("a").map(|e| e.entity_type), Some("Tool".to_owned()));
    }

    #[test]
    fn relationships_in_both_directions() {
        let store = KnowledgeStore::new();
        for id in ["a", "b", "c"] {
            store.add_entity(Entity::new(id, "Node")).expect("add");
        }
        store.add_relationship(Relationship::new("a", "b", "x")).expect("rel");
        store.add_relationship(Relationship::new("c", "a", "y")).expect("rel");

        assert_eq!(store.get_relationships("a").len(), 2);
        assert_eq!(store.get_relationships("b").len(), 1);
        assert!(store.get_relationships("nope").is_empty());
    }
}
