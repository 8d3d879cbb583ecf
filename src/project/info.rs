// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::path::{Path, PathBuf};

use crate::catalog::DatasetFactory;
use crate::config::consts::SETTINGS_FILE;
use crate::config::{find_project_root, ConfigLoader, ProjectSettings};
use crate::errors::ProjectError;
use crate::steps::StepRegistry;

/// What `conduit info` reports about the installation and, when one is
/// found, the current project.
#[derive(Debug, Clone)]
pub struct ProjectInfo {
    pub version: &'static str,
    pub project: Option<ProjectSummary>,
    pub step_functions: Vec<String>,
    pub dataset_types: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub struct ProjectSummary {
    pub name: String,
    pub version: String,
    pub root: PathBuf,
    pub default_env: String,
    pub pipelines: Vec<String>,
}

impl ProjectInfo {
    /// Gather information for `root`, or for the project enclosing the current
    /// directory when no root is given. An explicit root must be a project.
    pub fn gather(root: Option<&Path>) -> Result<Self, ProjectError> {
        let project_root = match root {
            Some(root) if root.join(SETTINGS_FILE).is_file() => Some(root.to_path_buf()),
            Some(root) => return Err(ProjectError::NotAProject(root.to_path_buf())),
            None => find_project_root(std::env::current_dir()?),
        };

        let project = project_root.map(|root| summarize(&root)).transpose()?;

        Ok(Self {
            version: env!("CARGO_PKG_VERSION"),
            project,
            step_functions: StepRegistry::with_builtins()
                .names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            dataset_types: DatasetFactory::available_types(),
        })
    }
}

fn summarize(root: &Path) -> Result<ProjectSummary, ProjectError> {
    let settings = ProjectSettings::load(root)?;
    let loader = ConfigLoader::new(root, settings.config.default_env.clone());
    let pipelines = loader.pipelines()?.keys().cloned().collect();

    Ok(ProjectSummary {
        name: settings.project.name,
        version: settings.project.version,
        root: root.to_path_buf(),
        default_env: settings.config.default_env,
        pipelines,
    })
}

impl fmt::Display for ProjectInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "conduit version: {}", self.version)?;
        match &self.project {
            Some(project) => {
                writeln!(f, "project: {} {}", project.name, project.version)?;
                writeln!(f, "  root: {}", project.root.display())?;
                writeln!(f, "  default env: {}", project.default_env)?;
                writeln!(f, "  pipelines: {}", join_or_none(&project.pipelines))?;
            }
            None => writeln!(f, "project: none found")?,
        }
        writeln!(f, "step functions: {}", join_or_none(&self.step_functions))?;
        write!(f, "dataset types: {}", self.dataset_types.join(", "))
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}
