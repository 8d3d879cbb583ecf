// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The data catalog: the registry of named artifacts.
//!
//! Steps never touch storage directly. They name artifacts, and the catalog maps
//! each name to a [`Dataset`] that knows how to load and save it. Entries come
//! from `catalog*.yml`; parameters are fed in as in-memory `params:` entries;
//! outputs nobody declared get a memory dataset at run start.
//!
//! # Example
//!
//! ```yaml
//! companies:
//!   type: csv
//!   filepath: data/01_raw/companies.csv
//!
//! "{name}_report":
//!   type: json
//!   filepath: data/08_reporting/{name}.json
//! ```

pub mod data;
pub mod datasets;
pub mod factory;
pub mod patterns;

pub use data::{Data, Table};
pub use factory::DatasetFactory;
pub use patterns::DatasetPattern;

use indexmap::IndexMap;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::consts::{PARAMETERS_ARTIFACT, PARAMS_PREFIX};
use crate::config::CatalogConfig;
use crate::errors::CatalogError;
use crate::observability::messages::catalog::{
    DatasetLoading, DatasetReleased, DatasetSaving, PatternResolved,
};
use crate::observability::messages::StructuredLog;
use crate::traits::Dataset;
use datasets::MemoryDataset;

/// Named datasets plus the factory patterns that can create more.
///
/// Cloning is cheap: datasets are shared behind `Arc`, so a clone sees the same
/// stored data.
#[derive(Clone, Default)]
pub struct DataCatalog {
    datasets: IndexMap<String, Arc<dyn Dataset>>,
    patterns: Vec<DatasetPattern>,
    root: PathBuf,
}

impl DataCatalog {
    /// An empty catalog resolving relative paths against `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            datasets: IndexMap::new(),
            patterns: Vec::new(),
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Build datasets for every plain entry and keep pattern entries for later
    /// resolution.
    pub fn from_config<P: AsRef<Path>>(
        config: &CatalogConfig,
        root: P,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new(root);

        for (name, entry) in config {
            if DatasetPattern::is_pattern(name) {
                catalog.patterns.push(DatasetPattern::new(name, entry.clone()));
            } else {
                let dataset = DatasetFactory::create(name, entry, &catalog.root)?;
                catalog.datasets.insert(name.clone(), dataset);
            }
        }

        patterns::sort_by_specificity(&mut catalog.patterns);
        Ok(catalog)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Register a dataset under `name`. Fails when the name is taken unless
    /// `replace` is set.
    pub fn add(
        &mut self,
        name: &str,
        dataset: Arc<dyn Dataset>,
        replace: bool,
    ) -> Result<(), CatalogError> {
        if !replace && self.datasets.contains_key(name) {
            return Err(CatalogError::AlreadyExists(name.to_string()));
        }
        self.datasets.insert(name.to_string(), dataset);
        Ok(())
    }

    /// Register parameters as memory datasets: the whole mapping as
    /// `parameters`, and every nested key as `params:<dotted.path>`.
    pub fn add_feed_dict(&mut self, parameters: &Value) {
        self.datasets.insert(
            PARAMETERS_ARTIFACT.to_string(),
            Arc::new(MemoryDataset::with_data(Data::Json(parameters.clone()))),
        );

        let mut feed = Vec::new();
        flatten_parameters(parameters, "", &mut feed);
        for (key, value) in feed {
            self.datasets.insert(
                format!("{}{}", PARAMS_PREFIX, key),
                Arc::new(MemoryDataset::with_data(Data::Json(value))),
            );
        }
    }

    /// Whether `name` is registered or matches a factory pattern
    pub fn contains(&self, name: &str) -> bool {
        self.datasets.contains_key(name) || self.matching_pattern(name).is_some()
    }

    /// Make sure `name` has a concrete dataset, creating one from the most
    /// specific matching pattern when needed.
    ///
    /// # Returns
    /// * `Ok(true)` - The name is now registered
    /// * `Ok(false)` - Neither registered nor matched by a pattern
    pub fn resolve(&mut self, name: &str) -> Result<bool, CatalogError> {
        if self.datasets.contains_key(name) {
            return Ok(true);
        }

        let Some(pattern) = self.matching_pattern(name) else {
            return Ok(false);
        };
        let Some(config) = pattern.materialize(name) else {
            return Ok(false);
        };

        PatternResolved {
            name,
            pattern: pattern.key(),
        }
        .log();

        let dataset = DatasetFactory::create(name, &config, &self.root)?;
        self.datasets.insert(name.to_string(), dataset);
        Ok(true)
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Dataset>, CatalogError> {
        self.datasets
            .get(name)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }

    pub async fn load(&self, name: &str) -> Result<Data, CatalogError> {
        let dataset = self.get(name)?;
        let description = dataset.describe();
        DatasetLoading {
            name,
            dataset: &description,
        }
        .log();

        dataset
            .load()
            .await
            .map_err(|e| CatalogError::dataset(name, e))
    }

    pub async fn save(&self, name: &str, data: Data) -> Result<(), CatalogError> {
        let dataset = self.get(name)?;
        let description = dataset.describe();
        DatasetSaving {
            name,
            dataset: &description,
            size: data.size_hint(),
        }
        .log();

        dataset
            .save(data)
            .await
            .map_err(|e| CatalogError::dataset(name, e))
    }

    /// Whether data is available for `name`; unregistered names report `false`
    pub async fn exists(&self, name: &str) -> bool {
        match self.datasets.get(name) {
            Some(dataset) => dataset.exists().await,
            None => false,
        }
    }

    /// Drop any data a dataset holds in memory
    pub async fn release(&self, name: &str) {
        if let Some(dataset) = self.datasets.get(name) {
            dataset.release().await;
            DatasetReleased { name }.log();
        }
    }

    /// `type` of a registered dataset
    pub fn kind(&self, name: &str) -> Option<&'static str> {
        self.datasets.get(name).map(|d| d.kind())
    }

    /// Registered dataset names in registration order
    pub fn list(&self) -> Vec<&str> {
        self.datasets.keys().map(String::as_str).collect()
    }

    /// Factory pattern keys, most specific first
    pub fn patterns(&self) -> Vec<&str> {
        self.patterns.iter().map(DatasetPattern::key).collect()
    }

    /// Name to dataset description, for listing
    pub fn describe(&self) -> IndexMap<String, String> {
        self.datasets
            .iter()
            .map(|(name, dataset)| (name.clone(), dataset.describe()))
            .collect()
    }

    fn matching_pattern(&self, name: &str) -> Option<&DatasetPattern> {
        self.patterns.iter().find(|p| p.captures(name).is_some())
    }
}

fn flatten_parameters(value: &Value, prefix: &str, out: &mut Vec<(String, Value)>) {
    let Value::Object(map) = value else {
        return;
    };
    for (key, child) in map {
        let dotted = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        out.push((dotted.clone(), child.clone()));
        flatten_parameters(child, &dotted, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ArtifactConfig, DatasetType};
    use crate::errors::DatasetError;
    use serde_json::json;

    fn csv_entry(filepath: &str) -> ArtifactConfig {
        ArtifactConfig {
            dataset_type: DatasetType::Csv,
            filepath: Some(filepath.to_string()),
            ..ArtifactConfig::memory()
        }
    }

    #[tokio::test]
    async fn parameters_are_fed_by_dotted_path() {
        let mut catalog = DataCatalog::new(".");
        catalog.add_feed_dict(&json!({"rows": 2, "model": {"test_size": 0.2}}));

        assert_eq!(
            catalog.list(),
            vec![
                "parameters",
                "params:model",
                "params:model.test_size",
                "params:rows"
            ]
        );
        assert_eq!(catalog.load("params:rows").await.unwrap(), Data::Json(json!(2)));
        assert_eq!(
            catalog.load("params:model.test_size").await.unwrap(),
            Data::Json(json!(0.2))
        );
    }

    #[tokio::test]
    async fn unknown_and_unsaved_artifacts_fail() {
        let mut catalog = DataCatalog::new(".");
        assert!(matches!(
            catalog.load("missing").await,
            Err(CatalogError::NotFound(ref name)) if name == "missing"
        ));

        catalog
            .add("scratch", Arc::new(MemoryDataset::new()), false)
            .unwrap();
        assert!(matches!(
            catalog.load("scratch").await,
            Err(CatalogError::Dataset {
                source: DatasetError::NotSaved,
                ..
            })
        ));
        assert!(!catalog.exists("scratch").await);
    }

    #[test]
    fn add_refuses_duplicates_unless_replacing() {
        let mut catalog = DataCatalog::new(".");
        catalog.add("a", Arc::new(MemoryDataset::new()), false).unwrap();
        assert!(matches!(
            catalog.add("a", Arc::new(MemoryDataset::new()), false),
            Err(CatalogError::AlreadyExists(_))
        ));
        assert!(catalog.add("a", Arc::new(MemoryDataset::new()), true).is_ok());
    }

    #[tokio::test]
    async fn patterns_resolve_into_concrete_datasets() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CatalogConfig::new();
        config.insert("companies".into(), csv_entry("data/01_raw/companies.csv"));
        config.insert("{name}_table".into(), csv_entry("data/02_intermediate/{name}.csv"));

        let mut catalog = DataCatalog::from_config(&config, dir.path()).unwrap();
        assert_eq!(catalog.list(), vec!["companies"]);
        assert_eq!(catalog.patterns(), vec!["{name}_table"]);
        assert!(catalog.contains("shuttles_table"));
        assert!(!catalog.contains("shuttles"));

        assert!(catalog.resolve("shuttles_table").unwrap());
        assert!(!catalog.resolve("shuttles").unwrap());

        let table = Table::new(vec!["id".into()], vec![vec!["1".into()]]);
        catalog
            .save("shuttles_table", Data::Table(table.clone()))
            .await
            .unwrap();
        assert!(dir.path().join("data/02_intermediate/shuttles.csv").exists());
        assert_eq!(
            catalog.load("shuttles_table").await.unwrap(),
            Data::Table(table)
        );
    }

    #[tokio::test]
    async fn release_clears_memory_data() {
        let mut catalog = DataCatalog::new(".");
        catalog
            .add(
                "x",
                Arc::new(MemoryDataset::with_data(Data::Text("hi".into()))),
                false,
            )
            .unwrap();
        assert!(catalog.exists("x").await);

        let shared = catalog.clone();
        shared.release("x").await;
        assert!(!catalog.exists("x").await);
        assert_eq!(catalog.kind("x"), Some("memory"));
    }
}
