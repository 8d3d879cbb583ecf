// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Run machinery shared by every runner.
//!
//! A runner only decides how steps are batched: one step per batch for
//! sequential runs, one topological level per batch for parallel runs. Steps in
//! a batch run concurrently, bounded by a semaphore, and a batch completes
//! before the next one starts.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::Instrument;

use crate::catalog::datasets::MemoryDataset;
use crate::catalog::DataCatalog;
use crate::engine::release::ReleaseTracker;
use crate::engine::RunReport;
use crate::errors::{ExecutionError, FailureStrategy, ValidationError};
use crate::observability::messages::catalog::MemoryDatasetCreated;
use crate::observability::messages::engine::{
    RunCompleted, RunFailed, RunStarted, StepCompleted, StepFailed, StepSkipped, StepStarted,
};
use crate::observability::messages::validation::UnresolvedInputs;
use crate::observability::messages::StructuredLog;
use crate::pipeline::{Pipeline, Step};

/// How a runner wants a pipeline executed
pub(crate) struct RunPlan<'a> {
    pub runner: &'static str,
    pub pipeline: &'a Pipeline,
    pub batches: Vec<Vec<Step>>,
    pub max_concurrency: usize,
    pub failure_strategy: FailureStrategy,
}

pub(crate) async fn execute(
    plan: RunPlan<'_>,
    catalog: DataCatalog,
) -> Result<RunReport, ExecutionError> {
    let runner = plan.runner;
    let result = execute_batches(plan, catalog).await;
    if let Err(error) = &result {
        RunFailed { runner, error }.log();
    }
    result
}

async fn execute_batches(
    plan: RunPlan<'_>,
    mut catalog: DataCatalog,
) -> Result<RunReport, ExecutionError> {
    let pipeline = plan.pipeline;
    prepare_catalog(pipeline, &mut catalog)?;

    let max_concurrency = plan.max_concurrency.max(1);
    RunStarted {
        runner: plan.runner,
        step_count: pipeline.len(),
        max_concurrency,
    }
    .log();
    let started = Instant::now();

    let total = pipeline.len();
    let positions: HashMap<String, usize> = pipeline
        .steps()
        .iter()
        .enumerate()
        .map(|(i, s)| (s.name.clone(), i + 1))
        .collect();
    let dependencies = pipeline.graph().build_reverse_dependencies();

    let mut tracker = ReleaseTracker::new(pipeline, &catalog);
    let catalog = Arc::new(catalog);
    let semaphore = Arc::new(Semaphore::new(max_concurrency));
    let mut report = RunReport::default();
    // failed or skipped step -> the failed step responsible
    let mut blocked_by: HashMap<String, String> = HashMap::new();

    for batch in plan.batches {
        let mut tasks = Vec::new();

        for step in batch {
            let root_failure = dependencies
                .get(&step.name)
                .and_then(|deps| deps.iter().find_map(|d| blocked_by.get(d)))
                .cloned();
            if let Some(root) = root_failure {
                StepSkipped {
                    step: &step.name,
                    failed_upstream: &root,
                }
                .log();
                report.skipped.push(step.name.clone());
                blocked_by.insert(step.name.clone(), root);
                continue;
            }

            let position = positions.get(&step.name).copied().unwrap_or_default();
            let catalog = Arc::clone(&catalog);
            let semaphore = Arc::clone(&semaphore);

            tasks.push(tokio::spawn(async move {
                let outcome = match semaphore.acquire().await {
                    Ok(_permit) => run_step(&step, &catalog, position, total).await,
                    Err(e) => Err(format!("Failed to acquire semaphore permit: {}", e)),
                };
                (step, outcome)
            }));
        }

        let mut first_failure: Option<(String, String)> = None;
        for task in tasks {
            let (step, outcome) = task.await.map_err(|e| ExecutionError::InternalError {
                message: format!("Task join error: {}", e),
            })?;

            match outcome {
                Ok(duration) => {
                    StepCompleted {
                        step: &step.name,
                        duration,
                    }
                    .log();
                    report.completed.push(step.name.clone());
                    report.durations.insert(step.name.clone(), duration);
                    for name in tracker.step_finished(&step) {
                        catalog.release(&name).await;
                    }
                }
                Err(reason) => {
                    StepFailed {
                        step: &step.name,
                        error: &reason,
                    }
                    .log();
                    blocked_by.insert(step.name.clone(), step.name.clone());
                    if first_failure.is_none() {
                        first_failure = Some((step.name.clone(), reason.clone()));
                    }
                    report.failed.insert(step.name.clone(), reason);
                }
            }
        }

        if plan.failure_strategy == FailureStrategy::FailFast {
            if let Some((step, reason)) = first_failure {
                let resume_from = steps_to_resume_from(pipeline, &report.completed, &catalog);
                return Err(ExecutionError::StepFailed {
                    step,
                    reason,
                    resume_from,
                });
            }
        }
    }

    for name in tracker.drain() {
        catalog.release(&name).await;
    }

    for name in pipeline.outputs() {
        if catalog.kind(&name) == Some("memory") && catalog.exists(&name).await {
            let data = catalog.load(&name).await?;
            report.free_outputs.insert(name, data);
        }
    }

    RunCompleted {
        runner: plan.runner,
        completed: report.completed.len(),
        failed: report.failed.len(),
        skipped: report.skipped.len(),
        duration: started.elapsed(),
    }
    .log();

    Ok(report)
}

/// Resolve every artifact the pipeline names and back undeclared outputs with
/// memory datasets. Free inputs the catalog cannot provide fail the run before
/// any step starts.
pub(crate) fn prepare_catalog(
    pipeline: &Pipeline,
    catalog: &mut DataCatalog,
) -> Result<(), ExecutionError> {
    let free_inputs = pipeline.inputs();
    let mut unresolved = Vec::new();

    for name in pipeline.datasets() {
        let found = catalog.resolve(&name)?;
        if !found && free_inputs.contains(&name) {
            unresolved.push(name);
        }
    }

    if !unresolved.is_empty() {
        UnresolvedInputs {
            inputs: &unresolved,
        }
        .log();
        return Err(ValidationError::UnresolvedInputs { inputs: unresolved }.into());
    }

    for name in pipeline.all_outputs() {
        if catalog.kind(&name).is_none() {
            MemoryDatasetCreated { name: &name }.log();
            catalog.add(&name, Arc::new(MemoryDataset::new()), false)?;
        }
    }

    Ok(())
}

/// Load inputs in declared order, call the function, save outputs in declared
/// order. Errors are flattened to their message for the run report.
async fn run_step(
    step: &Step,
    catalog: &DataCatalog,
    position: usize,
    total: usize,
) -> Result<Duration, String> {
    let started = StepStarted {
        step: &step.name,
        function: step.func_name(),
        position,
        total,
    };
    started.log();
    let span = started.span("run_step");

    call_step(step, catalog).instrument(span).await
}

/// Load inputs, call the function and save its outputs
async fn call_step(step: &Step, catalog: &DataCatalog) -> Result<Duration, String> {
    let started = Instant::now();

    let mut inputs = Vec::with_capacity(step.inputs.len());
    for name in &step.inputs {
        inputs.push(catalog.load(name).await.map_err(|e| e.to_string())?);
    }

    let outputs = step.call(inputs).await.map_err(|e| e.to_string())?;
    if outputs.len() != step.outputs.len() {
        return Err(ExecutionError::OutputCountMismatch {
            step: step.name.clone(),
            expected: step.outputs.len(),
            actual: outputs.len(),
        }
        .to_string());
    }

    for (name, data) in step.outputs.iter().zip(outputs) {
        catalog.save(name, data).await.map_err(|e| e.to_string())?;
    }

    Ok(started.elapsed())
}

/// Steps to pass to `--from-steps` so a rerun finishes the pipeline.
///
/// Every unfinished step must rerun. So must the producer of any memory
/// artifact a rerun step reads, since memory data does not outlive the run.
/// The result is the rerun steps with no rerun predecessor, in execution order.
pub(crate) fn steps_to_resume_from(
    pipeline: &Pipeline,
    completed: &[String],
    catalog: &DataCatalog,
) -> Vec<String> {
    let completed: HashSet<&str> = completed.iter().map(String::as_str).collect();
    let producers: HashMap<&str, &str> = pipeline
        .steps()
        .iter()
        .flat_map(|s| s.outputs.iter().map(move |o| (o.as_str(), s.name.as_str())))
        .collect();

    let mut rerun: HashSet<String> = pipeline
        .steps()
        .iter()
        .filter(|s| !completed.contains(s.name.as_str()))
        .map(|s| s.name.clone())
        .collect();
    let mut queue: Vec<String> = rerun.iter().cloned().collect();

    while let Some(name) = queue.pop() {
        let Some(step) = pipeline.step(&name) else {
            continue;
        };
        for input in &step.inputs {
            if catalog.kind(input) != Some("memory") {
                continue;
            }
            if let Some(producer) = producers.get(input.as_str()) {
                if rerun.insert(producer.to_string()) {
                    queue.push(producer.to_string());
                }
            }
        }
    }

    let dependencies = pipeline.graph().build_reverse_dependencies();
    pipeline
        .steps()
        .iter()
        .filter(|s| rerun.contains(&s.name))
        .filter(|s| {
            !dependencies
                .get(&s.name)
                .is_some_and(|deps| deps.iter().any(|d| rerun.contains(d)))
        })
        .map(|s| s.name.clone())
        .collect()
}
