// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::catalog::Data;
use crate::config::StepOptions;
use crate::errors::StepError;

/// A registered unit of computation.
///
/// Receives the step's inputs in declared order and must return one value per
/// declared output, in declared order.
#[async_trait]
pub trait StepFunction: Send + Sync {
    async fn call(&self, inputs: Vec<Data>, options: &StepOptions) -> Result<Vec<Data>, StepError>;

    /// Name used by `func:` in pipeline configuration
    fn name(&self) -> &'static str;
}
