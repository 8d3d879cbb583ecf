// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

use super::ConfigError;

/// Errors raised while scaffolding projects and pipelines.
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("'{}' already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("'{}' is not a conduit project (no conduit.toml found)", .0.display())]
    NotAProject(PathBuf),

    /// The project exists but its configuration cannot be read
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
