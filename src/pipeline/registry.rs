// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use indexmap::IndexMap;

use crate::config::consts::DEFAULT_PIPELINE;
use crate::config::PipelineConfig;
use crate::errors::ConfigError;
use crate::pipeline::{Pipeline, PipelineAssembler};
use crate::steps::StepRegistry;

/// Named pipelines of a project.
///
/// Unless a project defines `__default__` itself, it is the union of every
/// other pipeline.
#[derive(Debug, Clone, Default)]
pub struct PipelineRegistry {
    pipelines: IndexMap<String, Pipeline>,
}

impl PipelineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble every configured pipeline and derive `__default__`
    pub fn from_configs(
        configs: &IndexMap<String, PipelineConfig>,
        steps: &StepRegistry,
    ) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        for (name, config) in configs {
            registry.insert(name, PipelineAssembler::assemble(config, steps)?);
        }
        registry.ensure_default()?;
        Ok(registry)
    }

    pub fn insert(&mut self, name: &str, pipeline: Pipeline) {
        self.pipelines.insert(name.to_string(), pipeline);
    }

    /// Add `__default__` as the union of all pipelines when it is missing
    pub fn ensure_default(&mut self) -> Result<(), ConfigError> {
        if self.pipelines.contains_key(DEFAULT_PIPELINE) {
            return Ok(());
        }

        let mut combined = Pipeline::default();
        for pipeline in self.pipelines.values() {
            combined = combined.union(pipeline).map_err(ConfigError::Validation)?;
        }
        self.pipelines.insert(DEFAULT_PIPELINE.to_string(), combined);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Pipeline, ConfigError> {
        self.pipelines
            .get(name)
            .ok_or_else(|| ConfigError::UnknownPipeline(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.pipelines.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;

    fn configs(entries: &[(&str, &str)]) -> IndexMap<String, PipelineConfig> {
        entries
            .iter()
            .map(|(name, yaml)| (name.to_string(), serde_yaml::from_str(yaml).unwrap()))
            .collect()
    }

    #[test]
    fn default_pipeline_is_the_union() {
        let registry = PipelineRegistry::from_configs(
            &configs(&[
                (
                    "data_processing",
                    "steps:\n  - {name: clean, func: identity, inputs: raw, outputs: clean}\n",
                ),
                (
                    "reporting",
                    "steps:\n  - {name: count, func: row_count, inputs: clean, outputs: summary}\n",
                ),
            ]),
            &StepRegistry::with_builtins(),
        )
        .unwrap();

        assert_eq!(
            registry.names(),
            vec!["data_processing", "reporting", "__default__"]
        );
        let default = registry.get("__default__").unwrap();
        assert_eq!(default.step_names(), vec!["clean", "count"]);
        assert_eq!(default.inputs().into_iter().collect::<Vec<_>>(), vec!["raw"]);
    }

    #[test]
    fn explicit_default_is_kept_and_unknown_names_fail() {
        let registry = PipelineRegistry::from_configs(
            &configs(&[
                (
                    "__default__",
                    "steps:\n  - {name: only, func: identity, inputs: a, outputs: b}\n",
                ),
                (
                    "other",
                    "steps:\n  - {name: more, func: identity, inputs: b, outputs: c}\n",
                ),
            ]),
            &StepRegistry::with_builtins(),
        )
        .unwrap();

        assert_eq!(registry.get("__default__").unwrap().step_names(), vec!["only"]);
        assert!(matches!(
            registry.get("missing"),
            Err(ConfigError::UnknownPipeline(_))
        ));
    }

    #[test]
    fn same_step_name_in_two_pipelines_fails() {
        let result = PipelineRegistry::from_configs(
            &configs(&[
                (
                    "data_processing",
                    "steps:\n  - {name: clean, func: identity, inputs: raw, outputs: x}\n",
                ),
                (
                    "reporting",
                    "steps:\n  - {name: clean, func: row_count, inputs: other_raw, outputs: y}\n",
                ),
            ]),
            &StepRegistry::with_builtins(),
        );

        match result {
            Err(ConfigError::Validation(errors)) => assert_eq!(
                errors,
                vec![ValidationError::DuplicateStepName {
                    step: "clean".into()
                }]
            ),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("conflicting steps were merged"),
        }
    }

    #[test]
    fn identical_steps_are_shared_between_pipelines() {
        let step = "steps:\n  - {name: clean, func: identity, inputs: raw, outputs: x, tags: [prep]}\n";
        let registry = PipelineRegistry::from_configs(
            &configs(&[("first", step), ("second", step)]),
            &StepRegistry::with_builtins(),
        )
        .unwrap();
        assert_eq!(registry.get("__default__").unwrap().step_names(), vec!["clean"]);
    }

    #[test]
    fn empty_project_has_empty_default() {
        let registry =
            PipelineRegistry::from_configs(&IndexMap::new(), &StepRegistry::with_builtins())
                .unwrap();
        assert!(registry.get("__default__").unwrap().is_empty());
    }
}
