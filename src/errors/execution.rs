// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use thiserror::Error;

use super::{CatalogError, ValidationError};

/// How a runner reacts when a step fails.
///
/// # Variants
/// * `FailFast` - Stop at the first failure and report which steps to resume from
/// * `ContinueOnError` - Skip everything downstream of a failed step, keep running independent branches
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureStrategy {
    #[default]
    FailFast,
    ContinueOnError,
}

/// Errors that abort a pipeline run.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// A step's function or I/O failed under the fail-fast strategy
    #[error(
        "Step '{step}' failed: {reason}. Resume the run with --from-steps {}",
        .resume_from.join(",")
    )]
    StepFailed {
        step: String,
        reason: String,
        resume_from: Vec<String>,
    },

    /// A step returned a different number of values than it declares outputs
    #[error("Step '{step}' declared {expected} output(s) but its function returned {actual}")]
    OutputCountMismatch {
        step: String,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Step names passed to a filter that do not exist in the pipeline
    #[error("Pipeline does not contain step(s): {}", .0.join(", "))]
    UnknownSteps(Vec<String>),

    /// Artifact names passed to a filter that no step reads or writes
    #[error("Pipeline does not contain artifact(s): {}", .0.join(", "))]
    UnknownArtifacts(Vec<String>),

    /// Filtering removed every step
    #[error("Pipeline contains no steps after applying filters")]
    EmptyPipeline,

    #[error("Internal error: {message}")]
    InternalError { message: String },
}
