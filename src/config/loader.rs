// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::consts::{
    BASE_ENV, CATALOG_PATTERN, CONF_DIR, PARAMETERS_PATTERN, PIPELINES_DIR,
};
use crate::config::{CatalogConfig, PipelineConfig};
use crate::errors::ConfigError;

/// Layered configuration loader.
///
/// Reads `conf/base/` first, then overlays the requested environment
/// (`conf/<env>/`). For catalog and parameter files, a top-level key defined by
/// the environment replaces the base definition of the same key. Within one
/// environment, every `catalog*.yml` (or `parameters*.yml`) file is merged and a
/// key defined twice is an error. Pipelines are one file per pipeline under
/// `pipelines/`; an environment file replaces the base file with the same stem.
///
/// ```text
/// conf/
///   base/
///     catalog.yml
///     parameters.yml
///     parameters_data_processing.yml
///     pipelines/
///       data_processing.yml
///   local/
///     catalog.yml
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    root: PathBuf,
    env: String,
}

impl ConfigLoader {
    pub fn new<P: AsRef<Path>>(root: P, env: impl Into<String>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            env: env.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn conf_dir(&self, env: &str) -> PathBuf {
        self.root.join(CONF_DIR).join(env)
    }

    /// Merged catalog configuration. Keys starting with `_` hold YAML anchors
    /// and are dropped.
    pub fn catalog(&self) -> Result<CatalogConfig, ConfigError> {
        let (mapping, origin) = self.merged(CATALOG_PATTERN)?;
        let mut catalog = CatalogConfig::new();

        for (key, value) in mapping {
            let Some(name) = key.as_str() else {
                continue;
            };
            if name.starts_with('_') {
                continue;
            }
            let path = origin.get(name).cloned().unwrap_or_default();
            let mut value = value;
            value.apply_merge().map_err(|source| ConfigError::Yaml {
                path: path.clone(),
                source,
            })?;
            let entry = serde_yaml::from_value(value)
                .map_err(|source| ConfigError::Yaml { path, source })?;
            catalog.insert(name.to_string(), entry);
        }

        Ok(catalog)
    }

    /// Merged parameters as a JSON object
    pub fn parameters(&self) -> Result<serde_json::Value, ConfigError> {
        let (mapping, _) = self.merged(PARAMETERS_PATTERN)?;
        serde_yaml::from_value(Value::Mapping(mapping)).map_err(|source| ConfigError::Yaml {
            path: self.conf_dir(BASE_ENV),
            source,
        })
    }

    /// Pipeline definitions keyed by file stem, sorted by name
    pub fn pipelines(&self) -> Result<IndexMap<String, PipelineConfig>, ConfigError> {
        let mut files: IndexMap<String, PathBuf> = IndexMap::new();
        for env in self.layers() {
            let dir = self.conf_dir(env).join(PIPELINES_DIR);
            for path in yaml_files(&dir)? {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    files.insert(stem.to_string(), path.clone());
                }
            }
        }
        files.sort_keys();

        let mut pipelines = IndexMap::new();
        for (name, path) in files {
            let content = read(&path)?;
            let config: PipelineConfig = if content.trim().is_empty() {
                PipelineConfig::default()
            } else {
                serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                    path: path.clone(),
                    source,
                })?
            };
            pipelines.insert(name, config);
        }

        Ok(pipelines)
    }

    fn layers(&self) -> Vec<&str> {
        if self.env == BASE_ENV {
            vec![BASE_ENV]
        } else {
            vec![BASE_ENV, self.env.as_str()]
        }
    }

    /// Base layer overlaid with the environment layer, plus the file each key came from
    fn merged(&self, pattern: &str) -> Result<(Mapping, IndexMap<String, PathBuf>), ConfigError> {
        let mut merged = Mapping::new();
        let mut origin = IndexMap::new();

        for env in self.layers() {
            let (layer, layer_origin) = self.load_layer(env, pattern)?;
            for (key, value) in layer {
                merged.insert(key, value);
            }
            origin.extend(layer_origin);
        }

        Ok((merged, origin))
    }

    fn load_layer(
        &self,
        env: &str,
        pattern: &str,
    ) -> Result<(Mapping, IndexMap<String, PathBuf>), ConfigError> {
        let mut layer = Mapping::new();
        let mut origin: IndexMap<String, PathBuf> = IndexMap::new();

        let files = yaml_files(&self.conf_dir(env))?
            .into_iter()
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(pattern))
            });

        for path in files {
            let content = read(&path)?;
            if content.trim().is_empty() {
                continue;
            }
            let mapping: Mapping =
                serde_yaml::from_str::<Option<Mapping>>(&content)
                    .map_err(|source| ConfigError::Yaml {
                        path: path.clone(),
                        source,
                    })?
                    .unwrap_or_default();

            for (key, value) in mapping {
                let Some(name) = key.as_str().map(str::to_string) else {
                    return Err(ConfigError::NonStringKey {
                        key: render_key(&key),
                        path: path.clone(),
                    });
                };
                if let Some(first) = origin.get(&name) {
                    return Err(ConfigError::DuplicateKey {
                        key: name,
                        env: env.to_string(),
                        first: first.clone(),
                        second: path.clone(),
                    });
                }
                origin.insert(name, path.clone());
                layer.insert(key, value);
            }
        }

        Ok((layer, origin))
    }
}

/// Compact YAML rendering of a mapping key, for error messages
fn render_key(key: &Value) -> String {
    serde_yaml::to_string(key)
        .map(|rendered| rendered.trim_end().to_string())
        .unwrap_or_else(|_| format!("{:?}", key))
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// `.yml`/`.yaml` files directly inside `dir`, sorted; a missing directory is empty
fn yaml_files(dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == "yml" || e == "yaml");
        if path.is_file() && is_yaml {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatasetType;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn environment_overrides_base_catalog_entries() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "conf/base/catalog.yml",
            "companies:\n  type: csv\n  filepath: data/01_raw/companies.csv\nshuttles:\n  type: csv\n  filepath: data/01_raw/shuttles.csv\n",
        );
        write(
            dir.path(),
            "conf/local/catalog.yml",
            "companies:\n  type: json\n  filepath: data/01_raw/companies.json\n",
        );

        let catalog = ConfigLoader::new(dir.path(), "local").catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog["companies"].dataset_type, DatasetType::Json);
        assert_eq!(catalog["shuttles"].dataset_type, DatasetType::Csv);

        let base_only = ConfigLoader::new(dir.path(), "base").catalog().unwrap();
        assert_eq!(base_only["companies"].dataset_type, DatasetType::Csv);
    }

    #[test]
    fn catalog_files_are_merged_and_anchors_dropped() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "conf/base/catalog.yml",
            "_csv: &csv\n  type: csv\ncompanies:\n  <<: *csv\n  filepath: a.csv\n",
        );
        write(
            dir.path(),
            "conf/base/catalog_reporting.yml",
            "report:\n  type: text\n  filepath: report.txt\n",
        );

        let catalog = ConfigLoader::new(dir.path(), "local").catalog().unwrap();
        let names: Vec<&String> = catalog.keys().collect();
        assert_eq!(names, vec!["companies", "report"]);
    }

    #[test]
    fn duplicate_keys_within_one_environment_fail() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "conf/base/catalog.yml", "a:\n  type: memory\n");
        write(dir.path(), "conf/base/catalog_more.yml", "a:\n  type: memory\n");

        let err = ConfigLoader::new(dir.path(), "local").catalog().unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateKey { ref key, .. } if key == "a"));
    }

    #[test]
    fn non_string_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "conf/base/parameters.yml", "1: one\n2: two\n");

        let err = ConfigLoader::new(dir.path(), "local").parameters().unwrap_err();
        match err {
            ConfigError::NonStringKey { key, path } => {
                assert_eq!(key, "1");
                assert!(path.ends_with("parameters.yml"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parameters_are_merged_across_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "conf/base/parameters.yml", "rows: 5\n");
        write(
            dir.path(),
            "conf/base/parameters_data_processing.yml",
            "model:\n  test_size: 0.2\n",
        );
        write(dir.path(), "conf/local/parameters.yml", "rows: 2\n");

        let params = ConfigLoader::new(dir.path(), "local").parameters().unwrap();
        assert_eq!(params["rows"], serde_json::json!(2));
        assert_eq!(params["model"]["test_size"], serde_json::json!(0.2));
    }

    #[test]
    fn missing_configuration_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path(), "local");
        assert!(loader.catalog().unwrap().is_empty());
        assert!(loader.pipelines().unwrap().is_empty());
        assert_eq!(loader.parameters().unwrap(), serde_json::json!({}));
    }

    #[test]
    fn pipelines_are_keyed_by_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "conf/base/pipelines/data_processing.yml",
            "steps:\n  - name: keep\n    func: head\n    inputs: companies\n    outputs: first\n",
        );
        write(dir.path(), "conf/base/pipelines/reporting.yml", "");
        write(
            dir.path(),
            "conf/local/pipelines/reporting.yml",
            "steps:\n  - name: count\n    func: row_count\n    inputs: first\n    outputs: summary\n",
        );

        let pipelines = ConfigLoader::new(dir.path(), "local").pipelines().unwrap();
        let names: Vec<&String> = pipelines.keys().collect();
        assert_eq!(names, vec!["data_processing", "reporting"]);
        assert_eq!(pipelines["reporting"].steps[0].name, "count");
    }
}
