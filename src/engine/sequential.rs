// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::catalog::DataCatalog;
use crate::engine::execution::{execute, RunPlan};
use crate::engine::RunReport;
use crate::errors::{ExecutionError, FailureStrategy};
use crate::pipeline::Pipeline;
use crate::traits::PipelineRunner;

/// Runs steps one at a time in topological order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialRunner;

impl SequentialRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PipelineRunner for SequentialRunner {
    async fn run_with_strategy(
        &self,
        pipeline: &Pipeline,
        catalog: DataCatalog,
        failure_strategy: FailureStrategy,
    ) -> Result<RunReport, ExecutionError> {
        let plan = RunPlan {
            runner: self.name(),
            pipeline,
            batches: pipeline.steps().iter().map(|s| vec![s.clone()]).collect(),
            max_concurrency: 1,
            failure_strategy,
        };
        execute(plan, catalog).await
    }

    fn name(&self) -> &'static str {
        "SequentialRunner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::datasets::MemoryDataset;
    use crate::catalog::{Data, Table};
    use crate::errors::ValidationError;
    use crate::pipeline::test_support::step;
    use crate::pipeline::Step;
    use crate::steps::StepRegistry;
    use std::sync::Arc;

    fn catalog_with(name: &str, data: Data) -> DataCatalog {
        let mut catalog = DataCatalog::new(".");
        catalog
            .add(name, Arc::new(MemoryDataset::with_data(data)), false)
            .unwrap();
        catalog
    }

    fn table(rows: usize) -> Data {
        Data::Table(Table::new(
            vec!["id".into()],
            (0..rows).map(|i| vec![i.to_string()]).collect(),
        ))
    }

    #[tokio::test]
    async fn runs_chain_and_returns_free_outputs() {
        let registry = StepRegistry::with_builtins();
        let pipeline = Pipeline::new(vec![
            Step::new("count", registry.get("row_count").unwrap(), ["first"], ["summary"]),
            Step::new("first", registry.get("head").unwrap(), ["raw"], ["first"]),
        ])
        .unwrap();

        let report = SequentialRunner
            .run(&pipeline, catalog_with("raw", table(9)))
            .await
            .unwrap();

        assert_eq!(report.completed, vec!["first", "count"]);
        assert!(report.is_success());
        assert_eq!(
            report.free_outputs["summary"],
            Data::Json(serde_json::json!({"rows": 5, "columns": 1}))
        );
        assert!(!report.free_outputs.contains_key("first"));
    }

    #[tokio::test]
    async fn intermediates_are_released_after_last_consumer() {
        let pipeline = Pipeline::new(vec![
            step("a", &["raw"], &["x"]),
            step("b", &["x"], &["y"]),
            step("c", &["x"], &["z"]),
        ])
        .unwrap();

        let mut catalog = catalog_with("raw", table(1));
        catalog
            .add("x", Arc::new(MemoryDataset::new()), false)
            .unwrap();
        let observer = catalog.clone();

        SequentialRunner.run(&pipeline, catalog).await.unwrap();
        assert!(!observer.exists("x").await);
        assert!(observer.exists("raw").await);
    }

    #[tokio::test]
    async fn missing_free_inputs_fail_before_running() {
        let pipeline = Pipeline::new(vec![
            step("a", &["shuttles", "companies"], &["x"]),
            step("b", &["x"], &["y"]),
        ])
        .unwrap();

        let err = SequentialRunner
            .run(&pipeline, DataCatalog::new("."))
            .await
            .unwrap_err();
        match err {
            ExecutionError::Validation(ValidationError::UnresolvedInputs { inputs }) => {
                assert_eq!(inputs, vec!["companies", "shuttles"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn output_count_is_checked() {
        // identity returns two values for a step that declares one output
        let pipeline = Pipeline::new(vec![step("a", &["raw", "raw2"], &["x"])]).unwrap();
        let mut catalog = catalog_with("raw", table(1));
        catalog
            .add("raw2", Arc::new(MemoryDataset::with_data(table(2))), false)
            .unwrap();

        let err = SequentialRunner.run(&pipeline, catalog).await.unwrap_err();
        match err {
            ExecutionError::StepFailed {
                step,
                reason,
                resume_from,
            } => {
                assert_eq!(step, "a");
                assert!(reason.contains("declared 1 output(s) but its function returned 2"));
                assert_eq!(resume_from, vec!["a"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
