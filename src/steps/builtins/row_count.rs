// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::Serialize;

use super::{expect_input_count, table_at};
use crate::catalog::Data;
use crate::config::StepOptions;
use crate::errors::StepError;
use crate::traits::StepFunction;

/// Summarizes a table's shape as `{"rows": n, "columns": m}`.
pub struct RowCountStep;

#[derive(Serialize)]
struct TableShape {
    rows: usize,
    columns: usize,
}

#[async_trait]
impl StepFunction for RowCountStep {
    async fn call(&self, inputs: Vec<Data>, _options: &StepOptions) -> Result<Vec<Data>, StepError> {
        expect_input_count(&inputs, 1, Some(1))?;
        let table = table_at(&inputs, 0)?;

        let shape = TableShape {
            rows: table.len(),
            columns: table.columns.len(),
        };
        let value = serde_json::to_value(shape)
            .map_err(|e| StepError::Other(format!("Failed to serialize result: {}", e)))?;
        Ok(vec![Data::Json(value)])
    }

    fn name(&self) -> &'static str {
        "row_count"
    }
}
