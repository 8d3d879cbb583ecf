// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structural validation of pipeline definitions.
//!
//! Steps are connected implicitly: a step that consumes artifact `x` depends on
//! the step that produces `x`. Validation runs, in order:
//!
//! 1. **Uniqueness**: step names are unique
//! 2. **Function resolution** (configuration only): every `func` is registered
//! 3. **Single producer**: no artifact is produced by more than one step
//! 4. **Cycle detection**: DFS with a recursion stack over the step graph
//!
//! Cycle detection only runs when the earlier checks pass, since it needs a
//! well-formed graph. All other errors are accumulated so a user sees every
//! problem at once.

use indexmap::IndexMap;
use std::collections::HashSet;

use crate::config::dependency_graph::{DependencyGraph, StepShape};
use crate::config::{PipelineConfig, StepConfig};
use crate::errors::ValidationError;
use crate::observability::messages::validation::{
    CyclicDependencyDetected, DuplicateStepName, OutputNotUnique,
};
use crate::observability::messages::StructuredLog;
use crate::steps::StepRegistry;

impl StepShape for StepConfig {
    fn step_name(&self) -> &str {
        &self.name
    }

    fn step_inputs(&self) -> &[String] {
        &self.inputs
    }

    fn step_outputs(&self) -> &[String] {
        &self.outputs
    }
}

/// Validate a pipeline definition against the step registry.
///
/// # Returns
///
/// * `Ok(())` - The pipeline can be assembled
/// * `Err(Vec<ValidationError>)` - Every problem found
pub fn validate_pipeline_config(
    config: &PipelineConfig,
    registry: &StepRegistry,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for step in &config.steps {
        if !registry.contains(&step.func) {
            errors.push(ValidationError::UnknownFunction {
                step: step.name.clone(),
                func: step.func.clone(),
            });
        }
    }

    if let Err(structural) = validate_steps(&config.steps) {
        errors.extend(structural);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the dependency structure of any step-shaped slice.
pub fn validate_steps<S: StepShape>(steps: &[S]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(duplicates) = validate_unique_step_names(steps) {
        errors.extend(duplicates);
    }

    if let Err(producers) = validate_unique_producers(steps) {
        errors.extend(producers);
    }

    if errors.is_empty() {
        if let Err(cycle) = validate_acyclic_graph(steps) {
            errors.push(cycle);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_unique_step_names<S: StepShape>(steps: &[S]) -> Result<(), Vec<ValidationError>> {
    let mut seen = HashSet::new();
    let mut errors = Vec::new();

    for step in steps {
        if !seen.insert(step.step_name()) {
            DuplicateStepName {
                step: step.step_name(),
            }
            .log();
            errors.push(ValidationError::DuplicateStepName {
                step: step.step_name().to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Every artifact may have at most one producing step
fn validate_unique_producers<S: StepShape>(steps: &[S]) -> Result<(), Vec<ValidationError>> {
    let mut producers: IndexMap<&str, Vec<String>> = IndexMap::new();
    for step in steps {
        for output in step.step_outputs() {
            producers
                .entry(output.as_str())
                .or_default()
                .push(step.step_name().to_string());
        }
    }

    let errors: Vec<ValidationError> = producers
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(artifact, producers)| {
            OutputNotUnique {
                artifact,
                producers: &producers,
            }
            .log();
            ValidationError::OutputNotUnique {
                artifact: artifact.to_string(),
                producers,
            }
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// DFS with a recursion stack ("three colours"). On a back edge the current
/// path is cut at the revisited step and closed, giving the exact cycle.
fn validate_acyclic_graph<S: StepShape>(steps: &[S]) -> Result<(), ValidationError> {
    let graph = DependencyGraph::from_steps(steps);

    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();

    // A step reading its own output never shows up as a graph edge between two
    // steps, so catch it here.
    for step in steps {
        if step
            .step_outputs()
            .iter()
            .any(|o| step.step_inputs().contains(o))
        {
            let cycle = vec![step.step_name().to_string(), step.step_name().to_string()];
            log_cycle(&cycle);
            return Err(ValidationError::CyclicDependency { cycle });
        }
    }

    for step in graph.keys() {
        if !visited.contains(step.as_str()) {
            if let Some(cycle) =
                dfs_cycle_detection(step, &graph, &mut visited, &mut rec_stack, &mut path)
            {
                log_cycle(&cycle);
                return Err(ValidationError::CyclicDependency { cycle });
            }
        }
    }

    Ok(())
}

fn log_cycle(cycle: &[String]) {
    let names: Vec<&str> = cycle.iter().map(String::as_str).collect();
    CyclicDependencyDetected { cycle: &names }.log();
}

fn dfs_cycle_detection(
    node: &str,
    graph: &DependencyGraph,
    visited: &mut HashSet<String>,
    rec_stack: &mut HashSet<String>,
    path: &mut Vec<String>,
) -> Option<Vec<String>> {
    visited.insert(node.to_string());
    rec_stack.insert(node.to_string());
    path.push(node.to_string());

    if let Some(neighbors) = graph.get_dependents(node) {
        for neighbor in neighbors {
            if !visited.contains(neighbor) {
                if let Some(cycle) = dfs_cycle_detection(neighbor, graph, visited, rec_stack, path)
                {
                    return Some(cycle);
                }
            } else if rec_stack.contains(neighbor) {
                let cycle_start = path.iter().position(|x| x == neighbor).unwrap_or(0);
                let mut cycle = path[cycle_start..].to_vec();
                cycle.push(neighbor.clone());
                return Some(cycle);
            }
        }
    }

    rec_stack.remove(node);
    path.pop();
    None
}
