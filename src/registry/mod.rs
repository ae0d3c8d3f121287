//! Versioned model registry.
//!
//! Persists trained model records with version archives, human-readable
//! tags, free-form metadata, and training-data snapshots. The registry
//! exclusively owns the stored representation; callers hold transient
//! in-memory copies. Lookups of absent models, versions, or tags return
//! `None`/`false`; only real storage failures error.

mod store;

pub use store::{FileStore, ModelStore};

use crate::error::Result;
use crate::models::{Method, MethodParams};
use crate::validation::ForecastMetrics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

/// Explicit registry configuration. There is no ambient default path;
/// the owner of the process decides where models live.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub root: PathBuf,
}

impl RegistryConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Lifecycle status of a stored model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    #[default]
    Active,
    Archived,
    Deprecated,
}

/// A trained model as persisted by the registry.
///
/// `id` and `timestamp` are assigned on first save when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub id: Option<String>,
    pub method: Method,
    pub parameters: MethodParams,
    pub metrics: ForecastMetrics,
    /// Names of the features the model was trained with.
    pub features: Vec<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub version: u32,
    pub status: ModelStatus,
    /// Version this record was rolled back from, when it was promoted by a
    /// rollback.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rolled_back_from: Option<u32>,
}

impl ModelRecord {
    pub fn new(method: Method, parameters: MethodParams, metrics: ForecastMetrics) -> Self {
        Self {
            id: None,
            method,
            parameters,
            metrics,
            features: Vec::new(),
            timestamp: None,
            version: 1,
            status: ModelStatus::default(),
            rolled_back_from: None,
        }
    }

    pub fn with_features(mut self, features: Vec<String>) -> Self {
        self.features = features;
        self
    }
}

/// A tag pointing at a specific version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagPointer {
    pub version: u32,
    pub tagged_at: DateTime<Utc>,
}

/// One deployment state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentEvent {
    pub environment: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Free-form model metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub tags: Vec<String>,
    pub description: String,
    pub owner: String,
    pub deployments: Vec<DeploymentEvent>,
}

/// Training data snapshot stored alongside a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingData {
    pub timestamps: Vec<DateTime<Utc>>,
    pub values: Vec<f64>,
}

/// The registry facade over a [`ModelStore`].
pub struct Registry<S: ModelStore = FileStore> {
    store: S,
}

impl Registry<FileStore> {
    /// Open a file-backed registry rooted at the configured directory.
    pub fn open(config: &RegistryConfig) -> Self {
        Self::with_store(FileStore::new(config))
    }
}

impl<S: ModelStore> Registry<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    /// Persist a model, assigning an id and timestamp when absent.
    ///
    /// The default id is the MD5 hash of the method name and the save
    /// timestamp.
    pub fn register(&self, mut record: ModelRecord) -> Result<ModelRecord> {
        let timestamp = *record.timestamp.get_or_insert_with(Utc::now);
        if record.id.is_none() {
            let digest = md5::compute(format!("{}{}", record.method, timestamp.to_rfc3339()));
            record.id = Some(format!("{:x}", digest));
        }

        let id = record.id.as_deref().expect("id assigned above");
        self.store.put(id, &record)?;
        debug!(id, method = %record.method, "registered model");
        Ok(record)
    }

    /// Load a model by id.
    pub fn get_model(&self, id: &str) -> Result<Option<ModelRecord>> {
        self.store.get(id)
    }

    /// Replace a model, archiving the prior copy under its version first.
    ///
    /// The replacement gets the next version number. Returns the stored
    /// record, or `None` when no model with this id exists.
    pub fn update_model(&self, id: &str, replacement: ModelRecord) -> Result<Option<ModelRecord>> {
        let Some(current) = self.store.get(id)? else {
            return Ok(None);
        };

        self.store.put_version(id, current.version, &current)?;

        let mut updated = replacement;
        updated.id = Some(id.to_string());
        updated.version = current.version + 1;
        updated.timestamp = Some(Utc::now());
        self.store.put(id, &updated)?;
        debug!(id, version = updated.version, "updated model");
        Ok(Some(updated))
    }

    /// Remove a model and all of its versions, tags, and data.
    pub fn delete_model(&self, id: &str) -> Result<bool> {
        self.store.delete(id)
    }

    /// List models matching dotted-path equality filters.
    ///
    /// Each filter path is resolved against the serialized record, e.g.
    /// `("method", "naive")` or `("parameters.window", 5)`. A record
    /// matches when every filter value is equal.
    pub fn list_models(&self, filters: &[(&str, Value)]) -> Result<Vec<ModelRecord>> {
        let mut matches = Vec::new();
        for id in self.store.list_ids()? {
            let Some(record) = self.store.get(&id)? else {
                continue;
            };
            let document = serde_json::to_value(&record)?;
            let matched = filters
                .iter()
                .all(|(path, expected)| lookup_path(&document, path) == Some(expected));
            if matched {
                matches.push(record);
            }
        }
        Ok(matches)
    }

    /// Snapshot the current state of a model under its version number.
    ///
    /// Returns the archived version, or `None` when the model is absent.
    pub fn create_version(&self, id: &str) -> Result<Option<u32>> {
        let Some(current) = self.store.get(id)? else {
            return Ok(None);
        };
        self.store.put_version(id, current.version, &current)?;
        Ok(Some(current.version))
    }

    /// List archived versions of a model, ascending.
    pub fn list_versions(&self, id: &str) -> Result<Vec<u32>> {
        self.store.list_versions(id)
    }

    /// Load a specific archived version.
    pub fn get_version(&self, id: &str, version: u32) -> Result<Option<ModelRecord>> {
        self.store.get_version(id, version)
    }

    /// Point a human-readable tag at a version.
    ///
    /// The version must exist, either archived or as the current record;
    /// returns false otherwise.
    pub fn tag_version(&self, id: &str, version: u32, tag: &str) -> Result<bool> {
        if !self.version_exists(id, version)? {
            return Ok(false);
        }
        self.store.put_tag(
            id,
            tag,
            &TagPointer {
                version,
                tagged_at: Utc::now(),
            },
        )?;
        Ok(true)
    }

    /// Resolve a tag to its model record.
    pub fn get_by_tag(&self, id: &str, tag: &str) -> Result<Option<ModelRecord>> {
        let Some(pointer) = self.store.get_tag(id, tag)? else {
            return Ok(None);
        };
        if let Some(archived) = self.store.get_version(id, pointer.version)? {
            return Ok(Some(archived));
        }
        // The tagged version may still be the live record.
        match self.store.get(id)? {
            Some(current) if current.version == pointer.version => Ok(Some(current)),
            _ => Ok(None),
        }
    }

    /// Roll the model back to an archived version.
    ///
    /// The current record is archived, the target version is promoted as
    /// the next version, and the promotion records where it came from.
    pub fn rollback(&self, id: &str, version: u32) -> Result<Option<ModelRecord>> {
        let Some(current) = self.store.get(id)? else {
            return Ok(None);
        };
        let Some(target) = self.store.get_version(id, version)? else {
            return Ok(None);
        };

        self.store.put_version(id, current.version, &current)?;

        let mut promoted = target;
        promoted.id = Some(id.to_string());
        promoted.version = current.version + 1;
        promoted.timestamp = Some(Utc::now());
        promoted.rolled_back_from = Some(version);
        self.store.put(id, &promoted)?;
        debug!(id, from = version, to = promoted.version, "rolled back model");
        Ok(Some(promoted))
    }

    /// Load a model's metadata.
    pub fn get_metadata(&self, id: &str) -> Result<Option<ModelMetadata>> {
        self.store.get_metadata(id)
    }

    /// Store a model's metadata. False when the model does not exist.
    pub fn set_metadata(&self, id: &str, metadata: &ModelMetadata) -> Result<bool> {
        if self.store.get(id)?.is_none() {
            return Ok(false);
        }
        self.store.put_metadata(id, metadata)?;
        Ok(true)
    }

    /// Append a deployment status transition to the model's history.
    pub fn record_deployment(&self, id: &str, environment: &str, status: &str) -> Result<bool> {
        if self.store.get(id)?.is_none() {
            return Ok(false);
        }
        let mut metadata = self.store.get_metadata(id)?.unwrap_or_default();
        metadata.deployments.push(DeploymentEvent {
            environment: environment.to_string(),
            status: status.to_string(),
            timestamp: Utc::now(),
        });
        self.store.put_metadata(id, &metadata)?;
        Ok(true)
    }

    /// Store the training data snapshot. False when the model is absent.
    pub fn save_training_data(&self, id: &str, data: &TrainingData) -> Result<bool> {
        if self.store.get(id)?.is_none() {
            return Ok(false);
        }
        self.store.put_training_data(id, data)?;
        Ok(true)
    }

    /// Load the training data snapshot.
    pub fn load_training_data(&self, id: &str) -> Result<Option<TrainingData>> {
        self.store.get_training_data(id)
    }

    fn version_exists(&self, id: &str, version: u32) -> Result<bool> {
        if self.store.get_version(id, version)?.is_some() {
            return Ok(true);
        }
        Ok(matches!(self.store.get(id)?, Some(current) if current.version == version))
    }
}

/// Resolve a dotted path (`metrics.mape`) inside a JSON document.
fn lookup_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(document, |value, key| value.get(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn sample_record(method: Method) -> ModelRecord {
        ModelRecord::new(
            method,
            MethodParams::default(),
            ForecastMetrics {
                mape: Some(7.5),
                ..Default::default()
            },
        )
        .with_features(vec!["lag_1".to_string(), "ma_3".to_string()])
    }

    fn open_registry(dir: &tempfile::TempDir) -> Registry {
        Registry::open(&RegistryConfig::new(dir.path()))
    }

    #[test]
    fn register_then_get_round_trips_with_assigned_identity() {
        let dir = tempdir().unwrap();
        let registry = open_registry(&dir);

        let registered = registry.register(sample_record(Method::Naive)).unwrap();
        let id = registered.id.clone().unwrap();
        assert!(registered.timestamp.is_some());
        assert_eq!(id.len(), 32); // md5 hex digest

        let loaded = registry.get_model(&id).unwrap().unwrap();
        assert_eq!(loaded, registered);
    }

    #[test]
    fn explicit_id_is_preserved() {
        let dir = tempdir().unwrap();
        let registry = open_registry(&dir);

        let mut record = sample_record(Method::Naive);
        record.id = Some("my-model".to_string());
        let registered = registry.register(record).unwrap();
        assert_eq!(registered.id.as_deref(), Some("my-model"));
        assert!(registry.get_model("my-model").unwrap().is_some());
    }

    #[test]
    fn missing_model_is_none() {
        let dir = tempdir().unwrap();
        let registry = open_registry(&dir);
        assert!(registry.get_model("missing").unwrap().is_none());
    }

    #[test]
    fn update_archives_prior_version() {
        let dir = tempdir().unwrap();
        let registry = open_registry(&dir);

        let registered = registry.register(sample_record(Method::Naive)).unwrap();
        let id = registered.id.clone().unwrap();

        let updated = registry
            .update_model(&id, sample_record(Method::MovingAverage))
            .unwrap()
            .unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(updated.method, Method::MovingAverage);

        // The prior copy is archived under its version.
        let archived = registry.get_version(&id, 1).unwrap().unwrap();
        assert_eq!(archived.method, Method::Naive);
        assert_eq!(registry.list_versions(&id).unwrap(), vec![1]);
    }

    #[test]
    fn update_of_missing_model_is_none() {
        let dir = tempdir().unwrap();
        let registry = open_registry(&dir);
        let result = registry
            .update_model("missing", sample_record(Method::Naive))
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn delete_removes_everything() {
        let dir = tempdir().unwrap();
        let registry = open_registry(&dir);

        let registered = registry.register(sample_record(Method::Naive)).unwrap();
        let id = registered.id.clone().unwrap();
        registry.create_version(&id).unwrap();

        assert!(registry.delete_model(&id).unwrap());
        assert!(!registry.delete_model(&id).unwrap());
        assert!(registry.get_model(&id).unwrap().is_none());
        assert!(registry.list_versions(&id).unwrap().is_empty());
    }

    #[test]
    fn list_models_with_dotted_filters() {
        let dir = tempdir().unwrap();
        let registry = open_registry(&dir);

        registry.register(sample_record(Method::Naive)).unwrap();
        registry.register(sample_record(Method::MovingAverage)).unwrap();

        let all = registry.list_models(&[]).unwrap();
        assert_eq!(all.len(), 2);

        let naive = registry
            .list_models(&[("method", json!("naive"))])
            .unwrap();
        assert_eq!(naive.len(), 1);
        assert_eq!(naive[0].method, Method::Naive);

        let by_metric = registry
            .list_models(&[("metrics.mape", json!(7.5))])
            .unwrap();
        assert_eq!(by_metric.len(), 2);

        let none = registry
            .list_models(&[("metrics.mape", json!(1.0))])
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn tagging_and_tag_lookup() {
        let dir = tempdir().unwrap();
        let registry = open_registry(&dir);

        let registered = registry.register(sample_record(Method::Naive)).unwrap();
        let id = registered.id.clone().unwrap();

        // Tag the live version before any archive exists.
        assert!(registry.tag_version(&id, 1, "production").unwrap());
        let tagged = registry.get_by_tag(&id, "production").unwrap().unwrap();
        assert_eq!(tagged.version, 1);

        // Unknown versions and tags resolve to nothing.
        assert!(!registry.tag_version(&id, 9, "staging").unwrap());
        assert!(registry.get_by_tag(&id, "staging").unwrap().is_none());
    }

    #[test]
    fn tag_still_resolves_after_update() {
        let dir = tempdir().unwrap();
        let registry = open_registry(&dir);

        let registered = registry.register(sample_record(Method::Naive)).unwrap();
        let id = registered.id.clone().unwrap();
        registry.tag_version(&id, 1, "production").unwrap();
        registry
            .update_model(&id, sample_record(Method::MovingAverage))
            .unwrap();

        // Version 1 is archived now; the tag follows it.
        let tagged = registry.get_by_tag(&id, "production").unwrap().unwrap();
        assert_eq!(tagged.method, Method::Naive);
    }

    #[test]
    fn rollback_promotes_archived_version_with_provenance() {
        let dir = tempdir().unwrap();
        let registry = open_registry(&dir);

        let registered = registry.register(sample_record(Method::Naive)).unwrap();
        let id = registered.id.clone().unwrap();
        registry
            .update_model(&id, sample_record(Method::MovingAverage))
            .unwrap();

        let promoted = registry.rollback(&id, 1).unwrap().unwrap();
        assert_eq!(promoted.method, Method::Naive);
        assert_eq!(promoted.version, 3);
        assert_eq!(promoted.rolled_back_from, Some(1));

        // The pre-rollback current (version 2) is archived.
        let archived = registry.get_version(&id, 2).unwrap().unwrap();
        assert_eq!(archived.method, Method::MovingAverage);
    }

    #[test]
    fn rollback_to_missing_version_is_none() {
        let dir = tempdir().unwrap();
        let registry = open_registry(&dir);

        let registered = registry.register(sample_record(Method::Naive)).unwrap();
        let id = registered.id.clone().unwrap();
        assert!(registry.rollback(&id, 7).unwrap().is_none());
    }

    #[test]
    fn metadata_and_deployment_history() {
        let dir = tempdir().unwrap();
        let registry = open_registry(&dir);

        let registered = registry.register(sample_record(Method::Naive)).unwrap();
        let id = registered.id.clone().unwrap();

        let metadata = ModelMetadata {
            tags: vec!["finance".to_string()],
            description: "monthly revenue model".to_string(),
            owner: "forecasting-team".to_string(),
            deployments: Vec::new(),
        };
        assert!(registry.set_metadata(&id, &metadata).unwrap());

        registry.record_deployment(&id, "staging", "deployed").unwrap();
        registry.record_deployment(&id, "production", "deployed").unwrap();
        registry.record_deployment(&id, "production", "retired").unwrap();

        let stored = registry.get_metadata(&id).unwrap().unwrap();
        assert_eq!(stored.owner, "forecasting-team");
        assert_eq!(stored.deployments.len(), 3);
        assert_eq!(stored.deployments[2].status, "retired");

        // Metadata operations against unknown models report false.
        assert!(!registry.set_metadata("missing", &metadata).unwrap());
        assert!(!registry.record_deployment("missing", "staging", "x").unwrap());
    }

    #[test]
    fn training_data_round_trip() {
        let dir = tempdir().unwrap();
        let registry = open_registry(&dir);

        let registered = registry.register(sample_record(Method::Naive)).unwrap();
        let id = registered.id.clone().unwrap();

        let data = TrainingData {
            timestamps: vec![Utc::now()],
            values: vec![1.0, 2.0],
        };
        assert!(registry.save_training_data(&id, &data).unwrap());
        let loaded = registry.load_training_data(&id).unwrap().unwrap();
        assert_eq!(loaded.values, data.values);

        assert!(!registry.save_training_data("missing", &data).unwrap());
        assert!(registry.load_training_data("missing").unwrap().is_none());
    }

    #[test]
    fn lookup_path_resolves_nested_keys() {
        let document = json!({"metrics": {"mape": 5.0}, "method": "naive"});
        assert_eq!(lookup_path(&document, "method"), Some(&json!("naive")));
        assert_eq!(lookup_path(&document, "metrics.mape"), Some(&json!(5.0)));
        assert_eq!(lookup_path(&document, "metrics.rmse"), None);
    }
}
