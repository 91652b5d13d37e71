//! Tracked entity list management.

use std::sync::Arc;

use tracing::info;

use crate::domain::entities::TrackedEntity;
use crate::domain::errors::StoreError;
use crate::domain::ports::LocalStorePort;

/// Adds and removes tracked entities.
#[derive(Clone)]
pub struct EntityRegistry {
    store: Arc<dyn LocalStorePort>,
}

impl EntityRegistry {
    #[must_use]
    pub fn new(store: Arc<dyn LocalStorePort>) -> Self {
        Self { store }
    }

    /// Tracked entities in insertion order.
    ///
    /// # Errors
    /// Returns error if the list cannot be loaded.
    pub fn list(&self) -> Result<Vec<TrackedEntity>, StoreError> {
        self.store.tracked_entities()
    }

    /// Adds `entity` unless its ID is already tracked. Returns whether it was added.
    ///
    /// # Errors
    /// Returns error if the list cannot be loaded or saved.
    pub fn add(&self, entity: TrackedEntity) -> Result<bool, StoreError> {
        let mut entities = self.store.tracked_entities()?;
        if entities.iter().any(|e| e.id == entity.id) {
            return Ok(false);
        }

        info!(entity_id = %entity.id, name = %entity.display_name, "Tracking entity");
        entities.push(entity);
        self.store.save_tracked_entities(&entities)?;
        Ok(true)
    }

    /// Stops tracking `id`. Returns whether it was tracked.
    ///
    /// # Errors
    /// Returns error if the list cannot be loaded or saved.
    pub fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut entities = self.store.tracked_entities()?;
        let before = entities.len();
        entities.retain(|e| e.id != id);

        if entities.len() == before {
            return Ok(false);
        }

        info!(entity_id = %id, "Stopped tracking entity");
        self.store.save_tracked_entities(&entities)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::store::InMemoryStore;

    #[test]
    fn test_add_ignores_duplicate_ids() {
        let registry = EntityRegistry::new(Arc::new(InMemoryStore::new()));

        assert!(registry.add(TrackedEntity::new("1", "First", "")).unwrap());
        assert!(!registry.add(TrackedEntity::new("1", "Renamed", "")).unwrap());
        assert!(registry.add(TrackedEntity::new("2", "Second", "")).unwrap());

        let names: Vec<_> = registry
            .list()
            .unwrap()
            .into_iter()
            .map(|e| e.display_name)
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn test_remove() {
        let registry = EntityRegistry::new(Arc::new(InMemoryStore::new()));
        registry.add(TrackedEntity::new("1", "First", "")).unwrap();

        assert!(registry.remove("1").unwrap());
        assert!(!registry.remove("1").unwrap());
        assert!(registry.list().unwrap().is_empty());
    }
}
