// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::catalog::DataCatalog;
use crate::engine::execution::{execute, RunPlan};
use crate::engine::RunReport;
use crate::errors::{ExecutionError, FailureStrategy};
use crate::observability::messages::engine::LevelComputationCompleted;
use crate::observability::messages::StructuredLog;
use crate::pipeline::Pipeline;
use crate::traits::PipelineRunner;

/// Runs a pipeline level by level.
///
/// Levels come from Kahn's algorithm over the step graph: level 0 holds steps
/// whose inputs all come from the catalog, level N holds steps whose producers
/// all sit in levels `0..N`. Every step of a level runs as its own tokio task,
/// at most `max_concurrency` at a time, and the next level starts once the
/// whole level has finished.
///
/// ```text
/// level 0: preprocess_companies  preprocess_shuttles   (concurrent)
/// level 1: create_model_input
/// level 2: report
/// ```
///
/// Steps share the catalog through an `Arc`. Datasets do their own locking, so
/// two steps of one level can read the same artifact at once.
#[derive(Debug, Clone, Copy)]
pub struct ParallelRunner {
    max_concurrency: usize,
}

impl ParallelRunner {
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }
}

impl Default for ParallelRunner {
    /// One slot per available CPU core, 4 when that cannot be detected
    fn default() -> Self {
        let concurrency = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self::new(concurrency)
    }
}

#[async_trait]
impl PipelineRunner for ParallelRunner {
    async fn run_with_strategy(
        &self,
        pipeline: &Pipeline,
        catalog: DataCatalog,
        failure_strategy: FailureStrategy,
    ) -> Result<RunReport, ExecutionError> {
        let batches: Vec<_> = pipeline
            .levels()
            .into_iter()
            .map(|level| level.into_iter().cloned().collect::<Vec<_>>())
            .collect();

        LevelComputationCompleted {
            level_count: batches.len(),
            step_count: pipeline.len(),
        }
        .log();

        let plan = RunPlan {
            runner: self.name(),
            pipeline,
            batches,
            max_concurrency: self.max_concurrency,
            failure_strategy,
        };
        execute(plan, catalog).await
    }

    fn name(&self) -> &'static str {
        "ParallelRunner"
    }
}
