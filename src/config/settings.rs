// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::consts::{DEFAULT_ENV, SETTINGS_FILE};
use crate::errors::{ConfigError, FailureStrategy};

/// Project-wide settings read from `conduit.toml`.
///
/// # Example
/// ```toml
/// [project]
/// name = "spaceflights"
/// version = "0.1.0"
///
/// [runner]
/// strategy = "parallel"
/// max_concurrency = 4
/// failure_strategy = "fail_fast"
///
/// [config]
/// default_env = "local"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSettings {
    pub project: ProjectMetadata,
    #[serde(default)]
    pub runner: RunnerSettings,
    #[serde(default)]
    pub config: ConfigSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMetadata {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// Runner selection and behaviour.
///
/// # Fields
/// * `strategy` - Which runner executes the pipeline
/// * `max_concurrency` - Upper bound on concurrently running steps (parallel runner only)
/// * `failure_strategy` - How to react to a failing step
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunnerSettings {
    #[serde(default)]
    pub strategy: Strategy,
    pub max_concurrency: Option<usize>,
    #[serde(default)]
    pub failure_strategy: FailureStrategy,
}

/// Execution strategy for pipeline runs.
///
/// # Variants
/// * `Sequential` - One step at a time in topological order
/// * `Parallel` - Topological levels, steps within a level run concurrently
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    Sequential,
    Parallel,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::Parallel => "parallel",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSettings {
    #[serde(default = "default_env")]
    pub default_env: String,
}

impl Default for ConfigSettings {
    fn default() -> Self {
        Self {
            default_env: default_env(),
        }
    }
}

fn default_env() -> String {
    DEFAULT_ENV.to_string()
}

impl ProjectSettings {
    /// Load `conduit.toml` from a project root
    pub fn load<P: AsRef<Path>>(root: P) -> Result<Self, ConfigError> {
        let root = root.as_ref();
        let path = root.join(SETTINGS_FILE);
        if !path.is_file() {
            return Err(ConfigError::NotAProject(root.to_path_buf()));
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Toml { path, source })
    }
}

/// Walk up from `start` until a directory containing `conduit.toml` is found
pub fn find_project_root<P: AsRef<Path>>(start: P) -> Option<PathBuf> {
    start
        .as_ref()
        .ancestors()
        .find(|dir| dir.join(SETTINGS_FILE).is_file())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_settings_uses_defaults() {
        let settings: ProjectSettings = toml::from_str(
            r#"
[project]
name = "spaceflights"
"#,
        )
        .unwrap();

        assert_eq!(settings.project.name, "spaceflights");
        assert_eq!(settings.project.version, "0.1.0");
        assert_eq!(settings.runner.strategy, Strategy::Sequential);
        assert_eq!(settings.runner.failure_strategy, FailureStrategy::FailFast);
        assert_eq!(settings.runner.max_concurrency, None);
        assert_eq!(settings.config.default_env, "local");
    }

    #[test]
    fn parse_full_settings() {
        let settings: ProjectSettings = toml::from_str(
            r#"
[project]
name = "spaceflights"
version = "1.2.0"

[runner]
strategy = "parallel"
max_concurrency = 3
failure_strategy = "continue_on_error"

[config]
default_env = "prod"
"#,
        )
        .unwrap();

        assert_eq!(settings.runner.strategy, Strategy::Parallel);
        assert_eq!(settings.runner.max_concurrency, Some(3));
        assert_eq!(
            settings.runner.failure_strategy,
            FailureStrategy::ContinueOnError
        );
        assert_eq!(settings.config.default_env, "prod");
    }

    #[test]
    fn load_reports_missing_project() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProjectSettings::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NotAProject(_)));
    }

    #[test]
    fn find_project_root_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "[project]\nname = \"x\"\n").unwrap();
        let nested = dir.path().join("data").join("01_raw");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested).as_deref(), Some(dir.path()));
    }
}
