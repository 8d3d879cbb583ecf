// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use super::{expect_input_count, string_list_option, table_at};
use crate::catalog::Data;
use crate::config::StepOptions;
use crate::errors::StepError;
use crate::traits::StepFunction;

/// Projects a table onto `options.columns`, in the listed order.
pub struct SelectColumnsStep;

#[async_trait]
impl StepFunction for SelectColumnsStep {
    async fn call(&self, inputs: Vec<Data>, options: &StepOptions) -> Result<Vec<Data>, StepError> {
        expect_input_count(&inputs, 1, Some(1))?;
        let columns = string_list_option(options, "columns")?;
        let table = table_at(&inputs, 0)?.select(&columns)?;
        Ok(vec![Data::Table(table)])
    }

    fn name(&self) -> &'static str {
        "select_columns"
    }
}
