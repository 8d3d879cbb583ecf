// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{RunnerSettings, Strategy};
use crate::engine::parallel::ParallelRunner;
use crate::engine::sequential::SequentialRunner;
use crate::traits::PipelineRunner;

/// Factory for creating pipeline runners from project settings
pub struct RunnerFactory;

impl RunnerFactory {
    /// Create a runner for the configured strategy
    pub fn from_settings(settings: &RunnerSettings) -> Box<dyn PipelineRunner> {
        match settings.strategy {
            Strategy::Sequential => Box::new(SequentialRunner::new()),
            Strategy::Parallel => match settings.max_concurrency {
                Some(max_concurrency) => Box::new(ParallelRunner::new(max_concurrency)),
                None => Box::new(ParallelRunner::default()),
            },
        }
    }
}
