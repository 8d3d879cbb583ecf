// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::{HashMap, HashSet};

use crate::catalog::DataCatalog;
use crate::pipeline::{Pipeline, Step};

/// Counts outstanding consumers of in-memory intermediates.
///
/// Only memory artifacts that some step produces and some other step reads are
/// tracked. Free outputs stay in memory so the caller can read them after the
/// run, and fed-in artifacts such as parameters are never dropped.
#[derive(Debug, Default)]
pub(crate) struct ReleaseTracker {
    remaining: HashMap<String, usize>,
}

impl ReleaseTracker {
    pub fn new(pipeline: &Pipeline, catalog: &DataCatalog) -> Self {
        let inputs = pipeline.all_inputs();
        let remaining = pipeline
            .all_outputs()
            .into_iter()
            .filter(|name| inputs.contains(name))
            .filter(|name| catalog.kind(name) == Some("memory"))
            .map(|name| {
                let consumers = pipeline.consumers(&name).len();
                (name, consumers)
            })
            .collect();
        Self { remaining }
    }

    /// Record that `step` finished; returns artifacts with no consumers left
    pub fn step_finished(&mut self, step: &Step) -> Vec<String> {
        let mut released = Vec::new();
        let mut seen = HashSet::new();

        for input in step.inputs.iter().filter(|i| seen.insert(i.as_str())) {
            let Some(count) = self.remaining.get_mut(input) else {
                continue;
            };
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.remaining.remove(input);
                released.push(input.clone());
            }
        }
        released
    }

    /// Everything still tracked, for release at the end of a run
    pub fn drain(&mut self) -> Vec<String> {
        let mut names: Vec<String> = self.remaining.drain().map(|(name, _)| name).collect();
        names.sort();
        names
    }
}
