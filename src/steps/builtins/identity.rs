// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::catalog::Data;
use crate::config::StepOptions;
use crate::errors::StepError;
use crate::traits::StepFunction;

/// Passes each input through to the output at the same position.
pub struct IdentityStep;

#[async_trait]
impl StepFunction for IdentityStep {
    async fn call(&self, inputs: Vec<Data>, _options: &StepOptions) -> Result<Vec<Data>, StepError> {
        Ok(inputs)
    }

    fn name(&self) -> &'static str {
        "identity"
    }
}
