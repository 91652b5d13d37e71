//! Local store port definition.

use crate::domain::entities::{PostMap, ReadMarkers, Settings, TrackedEntity};
use crate::domain::errors::StoreError;

/// Port for synchronous key-value persistence.
///
/// Every method reads or writes one whole value; there are no partial updates.
pub trait LocalStorePort: Send + Sync {
    /// Loads settings.
    fn settings(&self) -> Result<Settings, StoreError>;

    /// Stores settings.
    fn save_settings(&self, settings: &Settings) -> Result<(), StoreError>;

    /// Loads the tracked entity list.
    fn tracked_entities(&self) -> Result<Vec<TrackedEntity>, StoreError>;

    /// Stores the tracked entity list.
    fn save_tracked_entities(&self, entities: &[TrackedEntity]) -> Result<(), StoreError>;

    /// Loads the cached post map.
    fn cached_posts(&self) -> Result<PostMap, StoreError>;

    /// Stores the cached post map.
    fn save_cached_posts(&self, posts: &PostMap) -> Result<(), StoreError>;

    /// Loads the read marker set.
    fn read_markers(&self) -> Result<ReadMarkers, StoreError>;

    /// Stores the read marker set.
    fn save_read_markers(&self, markers: &ReadMarkers) -> Result<(), StoreError>;
}
