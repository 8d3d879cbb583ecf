// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Project settings file that marks a project root
pub const SETTINGS_FILE: &str = "conduit.toml";
/// Directory holding configuration environments
pub const CONF_DIR: &str = "conf";
/// Environment every other environment is layered on top of
pub const BASE_ENV: &str = "base";
/// Environment used when none is requested
pub const DEFAULT_ENV: &str = "local";
/// Subdirectory of an environment holding one YAML file per pipeline
pub const PIPELINES_DIR: &str = "pipelines";
/// File name prefix for catalog configuration files
pub const CATALOG_PATTERN: &str = "catalog";
/// File name prefix for parameter files
pub const PARAMETERS_PATTERN: &str = "parameters";
/// Name of the pipeline that runs when none is requested
pub const DEFAULT_PIPELINE: &str = "__default__";
/// Artifact name holding the whole parameters mapping
pub const PARAMETERS_ARTIFACT: &str = "parameters";
/// Prefix of artifacts holding a single parameter
pub const PARAMS_PREFIX: &str = "params:";
/// Rows kept by `head`/`tail` when no count is given
pub const DEFAULT_ROW_COUNT: usize = 5;
