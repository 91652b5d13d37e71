//! JSON file store.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::domain::entities::{PostMap, ReadMarkers, Settings, TrackedEntity};
use crate::domain::errors::StoreError;
use crate::domain::ports::LocalStorePort;
use crate::infrastructure::config::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER};

const SETTINGS_FILE: &str = "settings.json";
const ENTITIES_FILE: &str = "entities.json";
const POSTS_FILE: &str = "posts.json";
const READ_MARKERS_FILE: &str = "read_markers.json";

/// Store keeping one JSON document per key in a data directory.
///
/// Missing documents read as defaults. Malformed documents are logged and read
/// as defaults too; they are only replaced on the next save.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Creates a store in the platform data directory.
    ///
    /// # Errors
    /// Returns error if the data directory cannot be determined.
    pub fn new() -> Result<Self, StoreError> {
        let data_dir = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| StoreError::Unavailable("no data directory".to_string()))?;

        Ok(Self { data_dir })
    }

    /// Creates a store in a specific directory.
    #[must_use]
    pub fn with_dir(path: PathBuf) -> Self {
        Self { data_dir: path }
    }

    /// Returns the data directory path.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn ensure_data_dir(&self) -> Result<(), StoreError> {
        if !self.data_dir.exists() {
            info!("Creating data directory at {:?}", self.data_dir);
            fs::create_dir_all(&self.data_dir)?;
        }
        Ok(())
    }

    fn load<T: DeserializeOwned + Default>(&self, file: &str) -> Result<T, StoreError> {
        let path = self.data_dir.join(file);
        if !path.exists() {
            return Ok(T::default());
        }

        let content = fs::read_to_string(&path)?;
        match serde_json::from_str(&content) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!("Failed to parse {:?}: {}. Using defaults.", path, e);
                Ok(T::default())
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        self.ensure_data_dir()?;
        let path = self.data_dir.join(file);
        let content = serde_json::to_vec_pretty(value)?;

        let mut temp_file = tempfile::NamedTempFile::new_in(&self.data_dir)?;
        temp_file.write_all(&content)?;
        temp_file.persist(&path).map_err(|e| e.error)?;

        Ok(())
    }
}

impl LocalStorePort for FileStore {
    fn settings(&self) -> Result<Settings, StoreError> {
        self.load(SETTINGS_FILE)
    }

    fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.save(SETTINGS_FILE, settings)
    }

    fn tracked_entities(&self) -> Result<Vec<TrackedEntity>, StoreError> {
        self.load(ENTITIES_FILE)
    }

    fn save_tracked_entities(&self, entities: &[TrackedEntity]) -> Result<(), StoreError> {
        self.save(ENTITIES_FILE, entities)
    }

    fn cached_posts(&self) -> Result<PostMap, StoreError> {
        self.load(POSTS_FILE)
    }

    fn save_cached_posts(&self, posts: &PostMap) -> Result<(), StoreError> {
        self.save(POSTS_FILE, posts)
    }

    fn read_markers(&self) -> Result<ReadMarkers, StoreError> {
        self.load(READ_MARKERS_FILE)
    }

    fn save_read_markers(&self, markers: &ReadMarkers) -> Result<(), StoreError> {
        self.save(READ_MARKERS_FILE, markers)
    }
}
