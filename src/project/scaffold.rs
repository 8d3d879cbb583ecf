// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::consts::{BASE_ENV, CONF_DIR, DEFAULT_ENV, PIPELINES_DIR, SETTINGS_FILE};
use crate::errors::ProjectError;

/// Data directories created in every new project, in processing order
pub const DATA_LAYERS: [&str; 8] = [
    "01_raw",
    "02_intermediate",
    "03_primary",
    "04_feature",
    "05_model_input",
    "06_models",
    "07_model_output",
    "08_reporting",
];

/// Create a new project directory named after `name` inside `parent`.
///
/// The directory name is the project name lowercased with spaces and hyphens
/// turned into underscores. Returns the path of the new project.
pub fn create_project(parent: &Path, name: &str) -> Result<PathBuf, ProjectError> {
    validate_project_name(name)?;

    let root = parent.join(directory_name(name));
    if root.exists() {
        return Err(ProjectError::AlreadyExists(root));
    }

    let base = root.join(CONF_DIR).join(BASE_ENV);
    let local = root.join(CONF_DIR).join(DEFAULT_ENV);

    write_file(&root.join(SETTINGS_FILE), &gen_settings(name))?;
    write_file(&base.join("catalog.yml"), CATALOG_TEMPLATE)?;
    write_file(&base.join("parameters.yml"), PARAMETERS_TEMPLATE)?;
    write_file(&base.join(PIPELINES_DIR).join(".gitkeep"), "")?;
    write_file(&local.join("catalog.yml"), LOCAL_CATALOG_TEMPLATE)?;
    for layer in DATA_LAYERS {
        write_file(&root.join("data").join(layer).join(".gitkeep"), "")?;
    }

    info!(project = %name, path = %root.display(), "Created project");
    Ok(root)
}

/// Scaffold a pipeline definition plus its parameters file in a project.
///
/// Returns the path of the pipeline file.
pub fn create_pipeline(root: &Path, name: &str) -> Result<PathBuf, ProjectError> {
    validate_pipeline_name(name)?;
    if !root.join(SETTINGS_FILE).is_file() {
        return Err(ProjectError::NotAProject(root.to_path_buf()));
    }

    let base = root.join(CONF_DIR).join(BASE_ENV);
    let pipeline_file = base.join(PIPELINES_DIR).join(format!("{}.yml", name));
    let parameters_file = base.join(format!("parameters_{}.yml", name));

    for path in [&pipeline_file, &parameters_file] {
        if path.exists() {
            return Err(ProjectError::AlreadyExists(path.clone()));
        }
    }

    write_file(&pipeline_file, &gen_pipeline(name))?;
    write_file(&parameters_file, &gen_pipeline_parameters(name))?;

    info!(pipeline = %name, path = %pipeline_file.display(), "Created pipeline");
    Ok(pipeline_file)
}

fn validate_project_name(name: &str) -> Result<(), ProjectError> {
    let invalid = |reason: &str| ProjectError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.trim().chars().count() < 2 {
        return Err(invalid("must be at least 2 characters long"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-' || c == '_')
    {
        return Err(invalid(
            "may only contain letters, digits, spaces, hyphens and underscores",
        ));
    }
    Ok(())
}

fn validate_pipeline_name(name: &str) -> Result<(), ProjectError> {
    let invalid = |reason: &str| ProjectError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.len() < 2 {
        return Err(invalid("must be at least 2 characters long"));
    }
    if !name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return Err(invalid("must start with a letter or underscore"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid(
            "may only contain letters, digits and underscores",
        ));
    }
    Ok(())
}

fn directory_name(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

fn write_file(path: &Path, content: &str) -> Result<(), ProjectError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    debug!(path = %path.display(), "Wrote file");
    Ok(())
}

fn gen_settings(name: &str) -> String {
    format!(
        r#"[project]
name = "{name}"
version = "0.1.0"

[runner]
strategy = "sequential"
failure_strategy = "fail_fast"

[config]
default_env = "{env}"
"#,
        name = name.trim(),
        env = DEFAULT_ENV,
    )
}

const CATALOG_TEMPLATE: &str = r#"# Artifact registry: one entry per named artifact.
#
# companies:
#   type: csv
#   filepath: data/01_raw/companies.csv
#
# Artifacts used by a pipeline but missing here are kept in memory.

companies:
  type: csv
  filepath: data/01_raw/companies.csv
"#;

const PARAMETERS_TEMPLATE: &str = r#"# Project parameters, available to steps as `parameters` or `params:<key>`.
"#;

const LOCAL_CATALOG_TEMPLATE: &str = r#"# Machine-specific overrides of conf/base/catalog.yml. Entries here replace
# the base entry with the same name.
"#;

fn gen_pipeline(name: &str) -> String {
    format!(
        r#"# Steps of the '{name}' pipeline. Steps are connected through artifact
# names: a step reading an artifact runs after the step writing it.

steps:
  - name: preview_companies
    func: head
    inputs: [companies, "params:{name}.preview_rows"]
    outputs: {name}_preview
    tags: [{name}]
"#
    )
}

fn gen_pipeline_parameters(name: &str) -> String {
    format!(
        r#"# Parameters of the '{name}' pipeline.

{name}:
  preview_rows: 5
"#
    )
}
