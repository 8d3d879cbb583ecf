// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod catalog;
mod config;
mod execution;
mod project;
mod step;

pub use catalog::{CatalogError, DatasetError};
pub use config::{ConfigError, ValidationError};
pub use execution::{ExecutionError, FailureStrategy};
pub use project::ProjectError;
pub use step::StepError;
