// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod catalog_config;
mod dependency_graph;
mod loader;
mod pipeline_config;
mod runtime;
mod settings;
mod validation;

#[cfg(test)]
mod integration_tests;
pub mod consts;

pub use catalog_config::{ArtifactConfig, CatalogConfig, DatasetArgs, DatasetType};
pub use dependency_graph::{DependencyGraph, StepShape};
pub use loader::ConfigLoader;
pub use pipeline_config::{PipelineConfig, StepConfig, StepOptions};
pub use runtime::{Runtime, RuntimeBuilder};
pub use settings::{
    find_project_root, ConfigSettings, ProjectMetadata, ProjectSettings, RunnerSettings, Strategy,
};
pub use validation::{validate_pipeline_config, validate_steps};
