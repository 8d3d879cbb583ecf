// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use super::expect_input_count;
use crate::catalog::Data;
use crate::config::StepOptions;
use crate::errors::StepError;
use crate::traits::StepFunction;

/// Converts its input to JSON. Tables become arrays of row objects.
pub struct ToJsonStep;

#[async_trait]
impl StepFunction for ToJsonStep {
    async fn call(&self, inputs: Vec<Data>, _options: &StepOptions) -> Result<Vec<Data>, StepError> {
        expect_input_count(&inputs, 1, Some(1))?;
        Ok(vec![Data::Json(inputs[0].to_json())])
    }

    fn name(&self) -> &'static str {
        "to_json"
    }
}
