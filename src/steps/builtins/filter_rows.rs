// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use super::{expect_input_count, string_option, table_at};
use crate::catalog::Data;
use crate::config::StepOptions;
use crate::errors::StepError;
use crate::traits::StepFunction;

/// Keeps rows whose `options.column` cell equals `options.value`.
pub struct FilterRowsStep;

#[async_trait]
impl StepFunction for FilterRowsStep {
    async fn call(&self, inputs: Vec<Data>, options: &StepOptions) -> Result<Vec<Data>, StepError> {
        expect_input_count(&inputs, 1, Some(1))?;
        let column = string_option(options, "column")?;
        let value = string_option(options, "value")?;
        let table = table_at(&inputs, 0)?.filter_eq(&column, &value)?;
        Ok(vec![Data::Table(table)])
    }

    fn name(&self) -> &'static str {
        "filter_rows"
    }
}
