// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for dataset I/O and data catalog lookups.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by an individual dataset while loading or saving.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A memory dataset was loaded before anything was saved into it
    #[error("Data has not been saved yet")]
    NotSaved,

    /// A versioned dataset has no saved versions under its base path
    #[error("No saved version found under '{}'", .0.display())]
    NoVersionFound(PathBuf),

    /// A versioned save would overwrite an existing version directory
    #[error("Version directory '{}' already exists", .0.display())]
    VersionExists(PathBuf),

    /// The dataset cannot store the given kind of data
    #[error("{kind} dataset cannot store {found} data")]
    Unsupported { kind: &'static str, found: &'static str },

    /// A load or save argument has an invalid value
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Errors raised by the data catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Artifact '{0}' not found in the data catalog")]
    NotFound(String),

    #[error("Artifact '{0}' has already been registered")]
    AlreadyExists(String),

    /// A catalog entry cannot be turned into a dataset
    #[error("Invalid catalog entry '{name}': {reason}")]
    InvalidConfig { name: String, reason: String },

    /// A dataset failed while serving the named artifact
    #[error("Failed while handling artifact '{name}': {source}")]
    Dataset {
        name: String,
        #[source]
        source: DatasetError,
    },
}

impl CatalogError {
    pub fn dataset(name: &str, source: DatasetError) -> Self {
        CatalogError::Dataset {
            name: name.to_string(),
            source,
        }
    }
}
