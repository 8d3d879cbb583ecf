// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{validate_pipeline_config, PipelineConfig};
use crate::errors::{ConfigError, ValidationError};
use crate::pipeline::{Pipeline, Step};
use crate::steps::StepRegistry;

/// Turns pipeline configuration into a runnable [`Pipeline`].
pub struct PipelineAssembler;

impl PipelineAssembler {
    /// Resolve every `func` against `registry` and build the pipeline.
    ///
    /// All validation problems are collected and reported together as
    /// `ConfigError::Validation`.
    pub fn assemble(
        config: &PipelineConfig,
        registry: &StepRegistry,
    ) -> Result<Pipeline, ConfigError> {
        validate_pipeline_config(config, registry).map_err(ConfigError::Validation)?;

        let steps = config
            .steps
            .iter()
            .map(|cfg| {
                let function = registry.get(&cfg.func).ok_or_else(|| {
                    ValidationError::UnknownFunction {
                        step: cfg.name.clone(),
                        func: cfg.func.clone(),
                    }
                })?;
                Ok(Step::new(
                    &cfg.name,
                    function,
                    cfg.inputs.iter().cloned(),
                    cfg.outputs.iter().cloned(),
                )
                .with_tags(cfg.tags.iter().cloned())
                .with_options(cfg.options.clone()))
            })
            .collect::<Result<Vec<_>, ValidationError>>()
            .map_err(|e| ConfigError::Validation(vec![e]))?;

        Pipeline::new(steps).map_err(ConfigError::Validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> PipelineConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn assembles_steps_with_tags_and_options() {
        let config = parse(
            r#"
steps:
  - name: preprocess_companies
    func: head
    inputs: companies
    outputs: preprocessed_companies
    tags: [preprocessing]
    options:
      n: 2
"#,
        );
        let pipeline = PipelineAssembler::assemble(&config, &StepRegistry::with_builtins()).unwrap();
        let step = &pipeline.steps()[0];
        assert_eq!(step.func_name(), "head");
        assert!(step.tags.contains("preprocessing"));
        assert_eq!(step.options.get("n"), Some(&serde_yaml::Value::from(2)));
        assert_eq!(
            step.to_string(),
            "preprocess_companies: head([companies]) -> [preprocessed_companies]"
        );
    }

    #[test]
    fn reports_every_problem() {
        let config = parse(
            r#"
steps:
  - name: a
    func: train
    inputs: raw
    outputs: x
  - name: b
    func: identity
    inputs: raw
    outputs: x
"#,
        );
        match PipelineAssembler::assemble(&config, &StepRegistry::with_builtins()) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ValidationError::UnknownFunction { .. })));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ValidationError::OutputNotUnique { .. })));
            }
            other => panic!("unexpected result: {:?}", other.map(|p| p.len())),
        }
    }
}
