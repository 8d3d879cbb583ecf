// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::Path;
use std::sync::Arc;

use crate::catalog::datasets::{
    CsvDataset, JsonDataset, MemoryDataset, TextDataset, VersionedPath, YamlDataset,
};
use crate::config::{ArtifactConfig, DatasetType};
use crate::errors::{CatalogError, DatasetError};
use crate::traits::Dataset;

/// Builds dataset instances from catalog entries.
pub struct DatasetFactory;

impl DatasetFactory {
    /// Create a dataset for the entry `name`.
    ///
    /// The `type` field picks the implementation:
    /// - "memory" -> MemoryDataset (no filepath)
    /// - "csv" -> CsvDataset
    /// - "json" -> JsonDataset
    /// - "yaml" -> YamlDataset
    /// - "text" -> TextDataset
    ///
    /// Relative file paths resolve against `root`.
    pub fn create(
        name: &str,
        config: &ArtifactConfig,
        root: &Path,
    ) -> Result<Arc<dyn Dataset>, CatalogError> {
        if config.dataset_type == DatasetType::Memory {
            if config.filepath.is_some() || config.versioned {
                return Err(CatalogError::InvalidConfig {
                    name: name.to_string(),
                    reason: "memory datasets take no filepath and cannot be versioned".into(),
                });
            }
            return Ok(Arc::new(MemoryDataset::new()));
        }

        let filepath = config
            .filepath
            .as_deref()
            .ok_or_else(|| CatalogError::InvalidConfig {
                name: name.to_string(),
                reason: format!("{} datasets require a 'filepath'", config.dataset_type.as_str()),
            })?;

        let resolved = root.join(filepath);
        let path = if config.versioned {
            VersionedPath::versioned(resolved, config.load_version.clone())
        } else {
            VersionedPath::plain(resolved)
        };

        let invalid = |source: DatasetError| CatalogError::InvalidConfig {
            name: name.to_string(),
            reason: source.to_string(),
        };

        let dataset: Arc<dyn Dataset> = match config.dataset_type {
            DatasetType::Csv => Arc::new(
                CsvDataset::from_args(path, &config.load_args, &config.save_args).map_err(invalid)?,
            ),
            DatasetType::Json => Arc::new(
                JsonDataset::from_args(path, &config.load_args, &config.save_args)
                    .map_err(invalid)?,
            ),
            DatasetType::Yaml => Arc::new(
                YamlDataset::from_args(path, &config.load_args, &config.save_args)
                    .map_err(invalid)?,
            ),
            DatasetType::Text => Arc::new(
                TextDataset::from_args(path, &config.load_args, &config.save_args)
                    .map_err(invalid)?,
            ),
            DatasetType::Memory => Arc::new(MemoryDataset::new()),
        };

        Ok(dataset)
    }

    /// Names of every supported `type:` value
    pub fn available_types() -> Vec<&'static str> {
        DatasetType::all().iter().map(DatasetType::as_str).collect()
    }

    pub fn is_type_available(name: &str) -> bool {
        Self::available_types().contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatasetArgs;

    fn entry(dataset_type: DatasetType, filepath: Option<&str>) -> ArtifactConfig {
        ArtifactConfig {
            dataset_type,
            filepath: filepath.map(str::to_string),
            ..ArtifactConfig::memory()
        }
    }

    #[test]
    fn creates_each_type() {
        let root = Path::new("/project");
        let csv = DatasetFactory::create("a", &entry(DatasetType::Csv, Some("data/a.csv")), root)
            .unwrap();
        assert_eq!(csv.kind(), "csv");
        assert!(csv.describe().contains("/project/data/a.csv"));

        for (dataset_type, kind) in [
            (DatasetType::Json, "json"),
            (DatasetType::Yaml, "yaml"),
            (DatasetType::Text, "text"),
        ] {
            let dataset = DatasetFactory::create("x", &entry(dataset_type, Some("x")), root).unwrap();
            assert_eq!(dataset.kind(), kind);
        }

        let memory = DatasetFactory::create("m", &entry(DatasetType::Memory, None), root).unwrap();
        assert_eq!(memory.kind(), "memory");
    }

    #[test]
    fn file_types_require_filepath() {
        let err = DatasetFactory::create("companies", &entry(DatasetType::Csv, None), Path::new("."))
            .err()
            .unwrap();
        assert!(matches!(err, CatalogError::InvalidConfig { ref name, .. } if name == "companies"));
    }

    #[test]
    fn unknown_arguments_are_rejected() {
        let mut config = entry(DatasetType::Json, Some("out.json"));
        let mut args = DatasetArgs::new();
        args.insert("indent".into(), serde_yaml::Value::from(4i64));
        config.save_args = args;

        let err = DatasetFactory::create("out", &config, Path::new("."))
            .err()
            .unwrap();
        assert!(err.to_string().contains("indent"));
    }

    #[tokio::test]
    async fn csv_arguments_reach_the_dataset() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("raw.csv"), "id;name\n1;Acme\n").unwrap();

        let mut config = entry(DatasetType::Csv, Some("raw.csv"));
        config
            .load_args
            .insert("delimiter".into(), serde_yaml::Value::from(";"));
        let dataset = DatasetFactory::create("raw", &config, dir.path()).unwrap();

        let data = dataset.load().await.unwrap();
        let table = data.as_table().unwrap();
        assert_eq!(table.columns, vec!["id", "name"]);
        assert_eq!(table.rows, vec![vec!["1", "Acme"]]);

        config.save_args.insert("sep".into(), serde_yaml::Value::from(","));
        let err = DatasetFactory::create("raw", &config, dir.path())
            .err()
            .unwrap();
        assert!(err.to_string().contains("sep"));
    }

    #[test]
    fn lists_types() {
        assert!(DatasetFactory::is_type_available("csv"));
        assert!(!DatasetFactory::is_type_available("parquet"));
        assert_eq!(DatasetFactory::available_types().len(), 5);
    }
}
