// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;

use super::{expect_input_count, table_at, usize_option};
use crate::catalog::Data;
use crate::config::consts::DEFAULT_ROW_COUNT;
use crate::config::StepOptions;
use crate::errors::StepError;
use crate::traits::StepFunction;

/// Keeps the first (`head`) or last (`tail`) rows of a table.
///
/// The row count comes from the optional second input (typically a
/// `params:` artifact), else the `n` option, else 5.
pub struct RowSliceStep {
    from_end: bool,
}

impl RowSliceStep {
    pub fn head() -> Self {
        Self { from_end: false }
    }

    pub fn tail() -> Self {
        Self { from_end: true }
    }

    fn row_count(inputs: &[Data], options: &StepOptions) -> Result<usize, StepError> {
        match inputs.get(1) {
            Some(Data::Json(Value::Number(n))) => n.as_u64().map(|n| n as usize).ok_or_else(|| {
                StepError::InvalidOption {
                    option: "n".into(),
                    reason: format!("row count must be a non-negative integer, got {}", n),
                }
            }),
            Some(other) => Err(StepError::TypeMismatch {
                index: 1,
                expected: "integer",
                found: other.kind(),
            }),
            None => Ok(usize_option(options, "n")?.unwrap_or(DEFAULT_ROW_COUNT)),
        }
    }
}

#[async_trait]
impl StepFunction for RowSliceStep {
    async fn call(&self, inputs: Vec<Data>, options: &StepOptions) -> Result<Vec<Data>, StepError> {
        expect_input_count(&inputs, 1, Some(2))?;
        let table = table_at(&inputs, 0)?;
        let n = Self::row_count(&inputs, options)?;

        let sliced = if self.from_end {
            table.tail(n)
        } else {
            table.head(n)
        };
        Ok(vec![Data::Table(sliced)])
    }

    fn name(&self) -> &'static str {
        if self.from_end {
            "tail"
        } else {
            "head"
        }
    }
}
