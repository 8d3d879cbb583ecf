// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;

/// Catalog configuration: artifact name to dataset definition, in declaration order.
pub type CatalogConfig = IndexMap<String, ArtifactConfig>;

/// Free-form `load_args` / `save_args` mapping
pub type DatasetArgs = HashMap<String, serde_yaml::Value>;

/// Definition of one catalog entry.
///
/// # Fields
/// * `dataset_type` - Storage format (`type:` in YAML)
/// * `filepath` - Location, relative paths resolve against the project root
/// * `load_args` / `save_args` - Format specific options
/// * `versioned` - Save each write under a timestamped directory
/// * `load_version` - Pin loads of a versioned dataset to one version
///
/// # Example
/// ```yaml
/// companies:
///   type: csv
///   filepath: data/01_raw/companies.csv
///   load_args:
///     delimiter: ","
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ArtifactConfig {
    #[serde(rename = "type")]
    pub dataset_type: DatasetType,
    pub filepath: Option<String>,
    #[serde(default)]
    pub load_args: DatasetArgs,
    #[serde(default)]
    pub save_args: DatasetArgs,
    #[serde(default)]
    pub versioned: bool,
    pub load_version: Option<String>,
}

impl ArtifactConfig {
    /// A plain in-memory entry
    pub fn memory() -> Self {
        Self {
            dataset_type: DatasetType::Memory,
            filepath: None,
            load_args: DatasetArgs::new(),
            save_args: DatasetArgs::new(),
            versioned: false,
            load_version: None,
        }
    }
}

/// Supported dataset types.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DatasetType {
    Memory,
    Csv,
    Json,
    Yaml,
    Text,
}

impl DatasetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetType::Memory => "memory",
            DatasetType::Csv => "csv",
            DatasetType::Json => "json",
            DatasetType::Yaml => "yaml",
            DatasetType::Text => "text",
        }
    }

    pub fn all() -> &'static [DatasetType] {
        &[
            DatasetType::Memory,
            DatasetType::Csv,
            DatasetType::Json,
            DatasetType::Yaml,
            DatasetType::Text,
        ]
    }

    pub fn is_file_backed(&self) -> bool {
        !matches!(self, DatasetType::Memory)
    }
}
