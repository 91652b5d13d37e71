//! Persisted read markers.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::domain::entities::{ReadMarkers, apply_read_marker};
use crate::domain::errors::StoreError;
use crate::domain::ports::LocalStorePort;

/// Monotonic read-marker set backed by the local store.
///
/// Clones share the cache lock that serializes every load-modify-save of the
/// cached posts.
#[derive(Clone)]
pub struct ReadTracker {
    store: Arc<dyn LocalStorePort>,
    cache_lock: Arc<Mutex<()>>,
}

impl ReadTracker {
    /// Creates a tracker over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn LocalStorePort>) -> Self {
        Self {
            store,
            cache_lock: Arc::default(),
        }
    }

    /// Lock held while the cached posts are loaded, changed and saved.
    ///
    /// Never held across an await.
    pub(crate) fn cache_lock(&self) -> &Mutex<()> {
        &self.cache_lock
    }

    /// Marks `id` read. Returns whether the marker was new.
    ///
    /// # Errors
    /// Returns error if the marker set cannot be loaded or saved.
    pub fn mark_read(&self, id: &str) -> Result<bool, StoreError> {
        let mut markers = self.store.read_markers()?;
        if !markers.insert(id) {
            return Ok(false);
        }

        self.store.save_read_markers(&markers)?;
        debug!(id, "Marked read");
        Ok(true)
    }

    /// Marks `id` read and applies it to the cached posts right away, so the
    /// change is visible before the next sync cycle reconciles it.
    ///
    /// # Errors
    /// Returns error if the store cannot be read or written.
    pub fn mark_read_in_cache(&self, id: &str) -> Result<bool, StoreError> {
        let new_marker = self.mark_read(id)?;

        let _cache = self.cache_lock.lock();
        let mut posts = self.store.cached_posts()?;
        let cache_changed = apply_read_marker(&mut posts, id);
        if cache_changed {
            self.store.save_cached_posts(&posts)?;
        }

        Ok(new_marker || cache_changed)
    }

    /// Whether `id` was marked read.
    ///
    /// # Errors
    /// Returns error if the marker set cannot be loaded.
    pub fn is_marked_read(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.store.read_markers()?.contains(id))
    }

    /// Loads the whole marker set for bulk lookups.
    ///
    /// # Errors
    /// Returns error if the marker set cannot be loaded.
    pub fn snapshot(&self) -> Result<ReadMarkers, StoreError> {
        self.store.read_markers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Post, PostMap};
    use crate::infrastructure::store::InMemoryStore;

    fn tracker() -> (Arc<InMemoryStore>, ReadTracker) {
        let store = Arc::new(InMemoryStore::new());
        let tracker = ReadTracker::new(store.clone());
        (store, tracker)
    }

    #[test]
    fn test_mark_read_is_idempotent() {
        let (store, tracker) = tracker();

        assert!(tracker.mark_read("p1").unwrap());
        assert!(!tracker.mark_read("p1").unwrap());
        assert!(tracker.is_marked_read("p1").unwrap());
        assert!(!tracker.is_marked_read("p2").unwrap());
        assert_eq!(store.read_markers().unwrap().len(), 1);
    }

    #[test]
    fn test_mark_read_in_cache_updates_post() {
        let (store, tracker) = tracker();
        let mut posts = PostMap::new();
        posts.insert("e".to_string(), vec![Post::new("p1", "e", 10, "t")]);
        store.save_cached_posts(&posts).unwrap();

        assert!(tracker.mark_read_in_cache("p1").unwrap());

        assert!(store.cached_posts().unwrap()["e"][0].is_read);
        assert!(tracker.snapshot().unwrap().contains("p1"));
    }

    #[test]
    fn test_mark_read_in_cache_waits_for_cache_lock() {
        let (store, tracker) = tracker();
        let mut posts = PostMap::new();
        posts.insert("e".to_string(), vec![Post::new("p1", "e", 10, "t")]);
        store.save_cached_posts(&posts).unwrap();

        let held = tracker.cache_lock().lock();
        let other = tracker.clone();
        let worker = std::thread::spawn(move || other.mark_read_in_cache("p1").unwrap());

        std::thread::sleep(std::time::Duration::from_millis(50));
        assert!(!store.cached_posts().unwrap()["e"][0].is_read);

        drop(held);
        assert!(worker.join().unwrap());
        assert!(store.cached_posts().unwrap()["e"][0].is_read);
    }
}
