// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Sub-pipeline selection.
//!
//! Every selector returns a new pipeline holding a subset of the steps, still in
//! execution order. Selectors that take step names reject names the pipeline
//! does not contain.

use indexmap::IndexSet;
use std::collections::HashSet;

use super::Pipeline;
use crate::errors::ExecutionError;

/// Criteria for running part of a pipeline. Empty criteria select everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunFilter {
    pub tags: Vec<String>,
    pub step_names: Vec<String>,
    pub from_steps: Vec<String>,
    pub to_steps: Vec<String>,
    pub from_inputs: Vec<String>,
    pub to_outputs: Vec<String>,
}

impl RunFilter {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
            && self.step_names.is_empty()
            && self.from_steps.is_empty()
            && self.to_steps.is_empty()
            && self.from_inputs.is_empty()
            && self.to_outputs.is_empty()
    }
}

impl Pipeline {
    /// Exactly the named steps
    pub fn only_steps(&self, names: &[String]) -> Result<Pipeline, ExecutionError> {
        self.check_step_names(names)?;
        Ok(self.subset(&names.iter().cloned().collect()))
    }

    /// Steps carrying at least one of `tags`
    pub fn only_steps_with_tags(&self, tags: &[String]) -> Pipeline {
        let keep = self
            .steps
            .iter()
            .filter(|s| s.has_any_tag(tags))
            .map(|s| s.name.clone())
            .collect();
        self.subset(&keep)
    }

    /// The named steps and everything downstream of them
    pub fn from_steps(&self, names: &[String]) -> Result<Pipeline, ExecutionError> {
        self.check_step_names(names)?;
        let keep = into_set(self.graph().descendants(names));
        Ok(self.subset(&keep))
    }

    /// The named steps and everything they depend on
    pub fn to_steps(&self, names: &[String]) -> Result<Pipeline, ExecutionError> {
        self.check_step_names(names)?;
        let keep = into_set(self.graph().ancestors(names));
        Ok(self.subset(&keep))
    }

    /// Steps reading any of `artifacts`, plus everything downstream
    pub fn from_inputs(&self, artifacts: &[String]) -> Result<Pipeline, ExecutionError> {
        self.check_artifacts(artifacts)?;
        let consumers: Vec<String> = self
            .steps
            .iter()
            .filter(|s| s.inputs.iter().any(|i| artifacts.contains(i)))
            .map(|s| s.name.clone())
            .collect();
        let keep = into_set(self.graph().descendants(&consumers));
        Ok(self.subset(&keep))
    }

    /// Steps writing any of `artifacts`, plus everything they depend on
    pub fn to_outputs(&self, artifacts: &[String]) -> Result<Pipeline, ExecutionError> {
        self.check_artifacts(artifacts)?;
        let producers: Vec<String> = self
            .steps
            .iter()
            .filter(|s| s.outputs.iter().any(|o| artifacts.contains(o)))
            .map(|s| s.name.clone())
            .collect();
        let keep = into_set(self.graph().ancestors(&producers));
        Ok(self.subset(&keep))
    }

    /// Apply every non-empty criterion and keep the steps selected by all of them.
    pub fn filter(&self, filter: &RunFilter) -> Result<Pipeline, ExecutionError> {
        let mut keep: HashSet<String> = self.steps.iter().map(|s| s.name.clone()).collect();
        let mut narrow = |selected: Pipeline| {
            let names: HashSet<String> = selected.steps.into_iter().map(|s| s.name).collect();
            keep.retain(|name| names.contains(name));
        };

        if !filter.tags.is_empty() {
            narrow(self.only_steps_with_tags(&filter.tags));
        }
        if !filter.step_names.is_empty() {
            narrow(self.only_steps(&filter.step_names)?);
        }
        if !filter.from_steps.is_empty() {
            narrow(self.from_steps(&filter.from_steps)?);
        }
        if !filter.to_steps.is_empty() {
            narrow(self.to_steps(&filter.to_steps)?);
        }
        if !filter.from_inputs.is_empty() {
            narrow(self.from_inputs(&filter.from_inputs)?);
        }
        if !filter.to_outputs.is_empty() {
            narrow(self.to_outputs(&filter.to_outputs)?);
        }

        let filtered = self.subset(&keep);
        if filtered.is_empty() {
            return Err(ExecutionError::EmptyPipeline);
        }
        Ok(filtered)
    }

    fn check_step_names(&self, names: &[String]) -> Result<(), ExecutionError> {
        let unknown: Vec<String> = names
            .iter()
            .filter(|n| self.step(n).is_none())
            .cloned()
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(ExecutionError::UnknownSteps(unknown))
        }
    }

    fn check_artifacts(&self, artifacts: &[String]) -> Result<(), ExecutionError> {
        let known = self.datasets();
        let unknown: Vec<String> = artifacts
            .iter()
            .filter(|a| !known.contains(*a))
            .cloned()
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(ExecutionError::UnknownArtifacts(unknown))
        }
    }
}

fn into_set(names: IndexSet<String>) -> HashSet<String> {
    names.into_iter().collect()
}
