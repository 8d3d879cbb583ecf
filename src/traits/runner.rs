// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::catalog::DataCatalog;
use crate::engine::RunReport;
use crate::errors::{ExecutionError, FailureStrategy};
use crate::pipeline::Pipeline;

#[async_trait]
pub trait PipelineRunner: Send + Sync {
    /// Run a pipeline against a catalog.
    ///
    /// - `pipeline`: validated, topologically ordered steps
    /// - `catalog`: artifact registry; the runner works on its own copy and
    ///   registers memory datasets for undeclared outputs
    ///
    /// Returns a report of completed, failed and skipped steps together with
    /// the data of free outputs that were only held in memory.
    async fn run(
        &self,
        pipeline: &Pipeline,
        catalog: DataCatalog,
    ) -> Result<RunReport, ExecutionError> {
        self.run_with_strategy(pipeline, catalog, FailureStrategy::default())
            .await
    }

    /// Run with a specific failure handling strategy
    async fn run_with_strategy(
        &self,
        pipeline: &Pipeline,
        catalog: DataCatalog,
        failure_strategy: FailureStrategy,
    ) -> Result<RunReport, ExecutionError>;

    fn name(&self) -> &'static str;
}
