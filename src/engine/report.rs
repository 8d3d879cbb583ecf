// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use indexmap::IndexMap;
use std::time::Duration;

use crate::catalog::Data;

/// Outcome of a pipeline run.
///
/// Under `fail_fast` a failing run returns an error instead, so `failed` and
/// `skipped` are only populated with `continue_on_error`.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Steps that finished, in completion order
    pub completed: Vec<String>,
    /// Failed steps and the reason each failed
    pub failed: IndexMap<String, String>,
    /// Steps not run because something upstream failed
    pub skipped: Vec<String>,
    /// Data of free outputs that only lived in memory
    pub free_outputs: IndexMap<String, Data>,
    pub durations: IndexMap<String, Duration>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }

    pub fn total_duration(&self) -> Duration {
        self.durations.values().sum()
    }
}
