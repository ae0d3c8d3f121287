//! File-backed model storage.
//!
//! [`ModelStore`] is the typed key-value interface the registry operates
//! against; the on-disk layout is an implementation detail of
//! [`FileStore`], so a database-backed store can replace it without
//! touching registry logic.
//!
//! `FileStore` layout, per model id:
//!
//! ```text
//! <root>/<id>/model.json
//! <root>/<id>/versions/<version>.json
//! <root>/<id>/tags/<tag>.json
//! <root>/<id>/metadata.json
//! <root>/<id>/data/training_data.json
//! ```

use crate::error::Result;
use crate::registry::{ModelMetadata, ModelRecord, RegistryConfig, TagPointer, TrainingData};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Typed key-value storage for model records and their sub-namespaces.
///
/// "Not found" is `Ok(None)`; only genuine I/O or serialization failures
/// error.
pub trait ModelStore {
    fn put(&self, id: &str, record: &ModelRecord) -> Result<()>;
    fn get(&self, id: &str) -> Result<Option<ModelRecord>>;
    /// Remove a model and everything under it. False when absent.
    fn delete(&self, id: &str) -> Result<bool>;
    fn list_ids(&self) -> Result<Vec<String>>;

    fn put_version(&self, id: &str, version: u32, record: &ModelRecord) -> Result<()>;
    fn get_version(&self, id: &str, version: u32) -> Result<Option<ModelRecord>>;
    fn list_versions(&self, id: &str) -> Result<Vec<u32>>;

    fn put_tag(&self, id: &str, tag: &str, pointer: &TagPointer) -> Result<()>;
    fn get_tag(&self, id: &str, tag: &str) -> Result<Option<TagPointer>>;

    fn put_metadata(&self, id: &str, metadata: &ModelMetadata) -> Result<()>;
    fn get_metadata(&self, id: &str) -> Result<Option<ModelMetadata>>;

    fn put_training_data(&self, id: &str, data: &TrainingData) -> Result<()>;
    fn get_training_data(&self, id: &str) -> Result<Option<TrainingData>>;
}

/// JSON-file store rooted at a configured directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            root: config.root.clone(),
        }
    }

    fn model_dir(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(value)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }
}

impl ModelStore for FileStore {
    fn put(&self, id: &str, record: &ModelRecord) -> Result<()> {
        self.write_json(&self.model_dir(id).join("model.json"), record)
    }

    fn get(&self, id: &str) -> Result<Option<ModelRecord>> {
        self.read_json(&self.model_dir(id).join("model.json"))
    }

    fn delete(&self, id: &str) -> Result<bool> {
        match fs::remove_dir_all(self.model_dir(id)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    ids.push(name.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn put_version(&self, id: &str, version: u32, record: &ModelRecord) -> Result<()> {
        let path = self
            .model_dir(id)
            .join("versions")
            .join(format!("{}.json", version));
        self.write_json(&path, record)
    }

    fn get_version(&self, id: &str, version: u32) -> Result<Option<ModelRecord>> {
        let path = self
            .model_dir(id)
            .join("versions")
            .join(format!("{}.json", version));
        self.read_json(&path)
    }

    fn list_versions(&self, id: &str) -> Result<Vec<u32>> {
        let dir = self.model_dir(id).join("versions");
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(stem) = Path::new(&name).file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Ok(version) = stem.parse::<u32>() {
                versions.push(version);
            }
        }
        versions.sort_unstable();
        Ok(versions)
    }

    fn put_tag(&self, id: &str, tag: &str, pointer: &TagPointer) -> Result<()> {
        let path = self.model_dir(id).join("tags").join(format!("{}.json", tag));
        self.write_json(&path, pointer)
    }

    fn get_tag(&self, id: &str, tag: &str) -> Result<Option<TagPointer>> {
        let path = self.model_dir(id).join("tags").join(format!("{}.json", tag));
        self.read_json(&path)
    }

    fn put_metadata(&self, id: &str, metadata: &ModelMetadata) -> Result<()> {
        self.write_json(&self.model_dir(id).join("metadata.json"), metadata)
    }

    fn get_metadata(&self, id: &str) -> Result<Option<ModelMetadata>> {
        self.read_json(&self.model_dir(id).join("metadata.json"))
    }

    fn put_training_data(&self, id: &str, data: &TrainingData) -> Result<()> {
        let path = self.model_dir(id).join("data").join("training_data.json");
        self.write_json(&path, data)
    }

    fn get_training_data(&self, id: &str) -> Result<Option<TrainingData>> {
        let path = self.model_dir(id).join("data").join("training_data.json");
        self.read_json(&path)
    }
}
