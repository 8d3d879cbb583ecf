// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for run lifecycle and step execution events.
//!
//! This module contains message types for logging events related to:
//! * Run start, completion and failure
//! * Topological level computation
//! * Individual step execution and skipping

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Run started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_conduit::observability::messages::engine::RunStarted;
///
/// let msg = RunStarted {
///     runner: "ParallelRunner",
///     step_count: 5,
///     max_concurrency: 4,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RunStarted<'a> {
    pub runner: &'a str,
    pub step_count: usize,
    pub max_concurrency: usize,
}

impl Display for RunStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Running pipeline with {}: {} steps, max_concurrency={}",
            self.runner, self.step_count, self.max_concurrency
        )
    }
}

impl StructuredLog for RunStarted<'_> {
    fn log(&self) {
        tracing::info!(
            runner = self.runner,
            step_count = self.step_count,
            max_concurrency = self.max_concurrency,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run",
            span_name = name,
            runner = self.runner,
            step_count = self.step_count,
            max_concurrency = self.max_concurrency,
        )
    }
}

/// Run finished, possibly with failed and skipped steps under `continue_on_error`.
///
/// # Log Level
/// `info!` when every step completed, `warn!` otherwise
pub struct RunCompleted<'a> {
    pub runner: &'a str,
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration: Duration,
}

impl Display for RunCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline run with {} finished in {:?}: {} completed, {} failed, {} skipped",
            self.runner, self.duration, self.completed, self.failed, self.skipped
        )
    }
}

impl StructuredLog for RunCompleted<'_> {
    fn log(&self) {
        if self.failed == 0 {
            tracing::info!(
                runner = self.runner,
                completed = self.completed,
                duration_ms = self.duration.as_millis() as u64,
                "{}", self
            );
        } else {
            tracing::warn!(
                runner = self.runner,
                completed = self.completed,
                failed = self.failed,
                skipped = self.skipped,
                duration_ms = self.duration.as_millis() as u64,
                "{}", self
            );
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run_completed",
            span_name = name,
            runner = self.runner,
            completed = self.completed,
            failed = self.failed,
            skipped = self.skipped,
            duration = ?self.duration,
        )
    }
}

/// Run aborted with an error.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct RunFailed<'a> {
    pub runner: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for RunFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Pipeline run with {} failed: {}", self.runner, self.error)
    }
}

impl StructuredLog for RunFailed<'_> {
    fn log(&self) {
        tracing::error!(
            runner = self.runner,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "run_failed",
            span_name = name,
            runner = self.runner,
            error = %self.error,
        )
    }
}

/// Topological levels computed for parallel execution.
///
/// # Log Level
/// `debug!` - Planning detail
pub struct LevelComputationCompleted {
    pub level_count: usize,
    pub step_count: usize,
}

impl Display for LevelComputationCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Computed {} levels for {} steps",
            self.level_count, self.step_count
        )
    }
}

impl StructuredLog for LevelComputationCompleted {
    fn log(&self) {
        tracing::debug!(
            level_count = self.level_count,
            step_count = self.step_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "level_computation",
            span_name = name,
            level_count = self.level_count,
            step_count = self.step_count,
        )
    }
}

/// A step is about to run.
///
/// # Example
/// ```
/// use the_conduit::observability::messages::engine::StepStarted;
///
/// let msg = StepStarted {
///     step: "preprocess_companies",
///     function: "head",
///     position: 1,
///     total: 3,
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Running step 'preprocess_companies' (head) [1/3]"
/// );
/// ```
pub struct StepStarted<'a> {
    pub step: &'a str,
    pub function: &'a str,
    pub position: usize,
    pub total: usize,
}

impl Display for StepStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Running step '{}' ({}) [{}/{}]",
            self.step, self.function, self.position, self.total
        )
    }
}

impl StructuredLog for StepStarted<'_> {
    fn log(&self) {
        tracing::info!(
            step = self.step,
            function = self.function,
            position = self.position,
            total = self.total,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "step",
            span_name = name,
            step = self.step,
            function = self.function,
        )
    }
}

pub struct StepCompleted<'a> {
    pub step: &'a str,
    pub duration: Duration,
}

impl Display for StepCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Completed step '{}' in {:?}", self.step, self.duration)
    }
}

impl StructuredLog for StepCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            step = self.step,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "step_completed",
            span_name = name,
            step = self.step,
            duration = ?self.duration,
        )
    }
}

pub struct StepFailed<'a> {
    pub step: &'a str,
    pub error: &'a str,
}

impl Display for StepFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Step '{}' failed: {}", self.step, self.error)
    }
}

impl StructuredLog for StepFailed<'_> {
    fn log(&self) {
        tracing::error!(step = self.step, error = self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "step_failed",
            span_name = name,
            step = self.step,
            error = self.error,
        )
    }
}

/// A step will not run because something upstream failed.
pub struct StepSkipped<'a> {
    pub step: &'a str,
    pub failed_upstream: &'a str,
}

impl Display for StepSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Skipping step '{}': upstream step '{}' failed",
            self.step, self.failed_upstream
        )
    }
}

impl StructuredLog for StepSkipped<'_> {
    fn log(&self) {
        tracing::warn!(
            step = self.step,
            failed_upstream = self.failed_upstream,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "step_skipped",
            span_name = name,
            step = self.step,
            failed_upstream = self.failed_upstream,
        )
    }
}
