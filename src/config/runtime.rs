// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};

use crate::catalog::DataCatalog;
use crate::config::{ConfigLoader, ProjectSettings};
use crate::engine::RunnerFactory;
use crate::errors::{ConfigError, FailureStrategy};
use crate::pipeline::PipelineRegistry;
use crate::steps::StepRegistry;
use crate::traits::PipelineRunner;

/// Everything needed to run a project's pipelines.
pub struct Runtime {
    pub root: PathBuf,
    pub env: String,
    pub settings: ProjectSettings,
    /// Catalog with parameters already fed in
    pub catalog: DataCatalog,
    pub pipelines: PipelineRegistry,
    pub steps: StepRegistry,
    pub runner: Box<dyn PipelineRunner>,
    pub failure_strategy: FailureStrategy,
}

/// Project runtime builder - loads settings and layered configuration and
/// wires up the catalog, pipelines and runner.
///
/// # Examples
///
/// ```no_run
/// use the_conduit::config::RuntimeBuilder;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let runtime = RuntimeBuilder::from_project("spaceflights", Some("local"))?;
/// let pipeline = runtime.pipelines.get("__default__")?;
/// let report = runtime
///     .runner
///     .run_with_strategy(pipeline, runtime.catalog.clone(), runtime.failure_strategy)
///     .await?;
/// println!("{} steps completed", report.completed.len());
/// # Ok(())
/// # }
/// ```
pub struct RuntimeBuilder {
    root: PathBuf,
    env: Option<String>,
    steps: StepRegistry,
}

impl RuntimeBuilder {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            env: None,
            steps: StepRegistry::with_builtins(),
        }
    }

    /// Configuration environment; defaults to `[config] default_env`
    pub fn env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    /// Functions available to pipelines; defaults to the built-ins
    pub fn steps(mut self, steps: StepRegistry) -> Self {
        self.steps = steps;
        self
    }

    /// Build the runtime for the project at `root`
    pub fn from_project<P: AsRef<Path>>(root: P, env: Option<&str>) -> Result<Runtime, ConfigError> {
        let builder = Self::new(root);
        match env {
            Some(env) => builder.env(env).build(),
            None => builder.build(),
        }
    }

    pub fn build(self) -> Result<Runtime, ConfigError> {
        let settings = ProjectSettings::load(&self.root)?;
        let env = self
            .env
            .unwrap_or_else(|| settings.config.default_env.clone());
        let loader = ConfigLoader::new(&self.root, env.clone());

        let mut catalog = DataCatalog::from_config(&loader.catalog()?, &self.root)?;
        catalog.add_feed_dict(&loader.parameters()?);

        let pipelines = PipelineRegistry::from_configs(&loader.pipelines()?, &self.steps)?;
        let runner = RunnerFactory::from_settings(&settings.runner);
        let failure_strategy = settings.runner.failure_strategy;

        Ok(Runtime {
            root: self.root,
            env,
            settings,
            catalog,
            pipelines,
            steps: self.steps,
            runner,
            failure_strategy,
        })
    }
}
