//! In-process store.

use parking_lot::RwLock;

use crate::domain::entities::{PostMap, ReadMarkers, Settings, TrackedEntity};
use crate::domain::errors::StoreError;
use crate::domain::ports::LocalStorePort;

/// Store keeping every value in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    settings: RwLock<Settings>,
    entities: RwLock<Vec<TrackedEntity>>,
    posts: RwLock<PostMap>,
    markers: RwLock<ReadMarkers>,
}

impl InMemoryStore {
    /// Creates an empty store holding default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorePort for InMemoryStore {
    fn settings(&self) -> Result<Settings, StoreError> {
        Ok(self.settings.read().clone())
    }

    fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        *self.settings.write() = settings.clone();
        Ok(())
    }

    fn tracked_entities(&self) -> Result<Vec<TrackedEntity>, StoreError> {
        Ok(self.entities.read().clone())
    }

    fn save_tracked_entities(&self, entities: &[TrackedEntity]) -> Result<(), StoreError> {
        *self.entities.write() = entities.to_vec();
        Ok(())
    }

    fn cached_posts(&self) -> Result<PostMap, StoreError> {
        Ok(self.posts.read().clone())
    }

    fn save_cached_posts(&self, posts: &PostMap) -> Result<(), StoreError> {
        self.posts.write().clone_from(posts);
        Ok(())
    }

    fn read_markers(&self) -> Result<ReadMarkers, StoreError> {
        Ok(self.markers.read().clone())
    }

    fn save_read_markers(&self, markers: &ReadMarkers) -> Result<(), StoreError> {
        self.markers.write().clone_from(markers);
        Ok(())
    }
}
