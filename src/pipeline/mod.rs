// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipelines: validated, dependency-ordered collections of steps.
//!
//! Steps are never wired to each other directly. A step that reads artifact
//! `x` depends on whichever step writes `x`, so the whole graph is derived from
//! artifact names. Building a [`Pipeline`] validates that graph and fixes a
//! deterministic execution order:
//!
//! ```text
//! companies ──► [preprocess_companies] ──► preprocessed_companies ─┐
//!                                                                  ├─► [create_model_input] ──► model_input
//! shuttles  ──► [preprocess_shuttles]  ──► preprocessed_shuttles  ─┘
//! ```

pub mod assembler;
pub mod filter;
pub mod registry;
pub mod step;

pub use assembler::PipelineAssembler;
pub use filter::RunFilter;
pub use registry::PipelineRegistry;
pub use step::Step;

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::config::{validate_steps, DependencyGraph};
use crate::errors::ValidationError;

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    /// Topological order, ties in declaration order
    steps: Vec<Step>,
}

impl Pipeline {
    /// Validate the steps and order them.
    ///
    /// # Returns
    /// * `Ok(Pipeline)` - Steps in deterministic topological order
    /// * `Err(Vec<ValidationError>)` - Duplicate names, shared outputs or cycles
    pub fn new(steps: Vec<Step>) -> Result<Self, Vec<ValidationError>> {
        validate_steps(&steps)?;

        let levels = DependencyGraph::from_steps(&steps)
            .topological_levels()
            .map_err(|e| vec![e])?;

        let mut by_name: HashMap<String, Step> =
            steps.into_iter().map(|s| (s.name.clone(), s)).collect();
        let ordered = levels
            .into_iter()
            .flatten()
            .filter_map(|name| by_name.remove(&name))
            .collect();

        Ok(Self { steps: ordered })
    }

    /// Keep the given steps of an already ordered pipeline
    fn subset(&self, keep: &HashSet<String>) -> Self {
        Self {
            steps: self
                .steps
                .iter()
                .filter(|s| keep.contains(&s.name))
                .cloned()
                .collect(),
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.name == name)
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn graph(&self) -> DependencyGraph {
        DependencyGraph::from_steps(&self.steps)
    }

    /// Topological levels. Steps in one level do not depend on each other.
    pub fn levels(&self) -> Vec<Vec<&Step>> {
        let index: HashMap<&str, &Step> =
            self.steps.iter().map(|s| (s.name.as_str(), s)).collect();

        match self.graph().topological_levels() {
            Ok(levels) => levels
                .iter()
                .map(|level| {
                    level
                        .iter()
                        .filter_map(|name| index.get(name.as_str()).copied())
                        .collect()
                })
                .collect(),
            // Construction already rejected cycles; run one step per level
            Err(_) => self.steps.iter().map(|s| vec![s]).collect(),
        }
    }

    /// Artifacts read by some step
    pub fn all_inputs(&self) -> BTreeSet<String> {
        self.steps.iter().flat_map(|s| s.inputs.clone()).collect()
    }

    /// Artifacts written by some step
    pub fn all_outputs(&self) -> BTreeSet<String> {
        self.steps.iter().flat_map(|s| s.outputs.clone()).collect()
    }

    /// Free inputs: read but not written inside the pipeline
    pub fn inputs(&self) -> BTreeSet<String> {
        let outputs = self.all_outputs();
        self.all_inputs()
            .into_iter()
            .filter(|name| !outputs.contains(name))
            .collect()
    }

    /// Free outputs: written but not read inside the pipeline
    pub fn outputs(&self) -> BTreeSet<String> {
        let inputs = self.all_inputs();
        self.all_outputs()
            .into_iter()
            .filter(|name| !inputs.contains(name))
            .collect()
    }

    /// Every artifact the pipeline touches
    pub fn datasets(&self) -> BTreeSet<String> {
        let mut all = self.all_inputs();
        all.extend(self.all_outputs());
        all
    }

    /// Steps reading `artifact`, in execution order
    pub fn consumers(&self, artifact: &str) -> Vec<&Step> {
        self.steps
            .iter()
            .filter(|s| s.inputs.iter().any(|i| i == artifact))
            .collect()
    }

    /// Combine two pipelines. A step defined identically in both is kept once;
    /// two different steps sharing a name fail validation.
    pub fn union(&self, other: &Pipeline) -> Result<Pipeline, Vec<ValidationError>> {
        let mut steps: Vec<Step> = self.steps.clone();
        for step in &other.steps {
            if !steps.iter().any(|kept| kept.same_definition(step)) {
                steps.push(step.clone());
            }
        }
        Pipeline::new(steps)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::steps::StepRegistry;

    /// An `identity` step wired to the given artifacts
    pub fn step(name: &str, inputs: &[&str], outputs: &[&str]) -> Step {
        let function = StepRegistry::with_builtins()
            .get("identity")
            .expect("identity is built in");
        Step::new(name, function, inputs.iter().copied(), outputs.iter().copied())
    }

    /// The spaceflights-style pipeline used across tests:
    ///
    /// companies -> preprocess_companies -> preprocessed_companies
    /// shuttles  -> preprocess_shuttles  -> preprocessed_shuttles
    /// both preprocessed + reviews -> create_model_input -> model_input
    /// model_input -> report -> summary
    pub fn spaceflights() -> Pipeline {
        Pipeline::new(vec![
            step("report", &["model_input"], &["summary"]).with_tags(["reporting"]),
            step("preprocess_companies", &["companies"], &["preprocessed_companies"])
                .with_tags(["preprocessing"]),
            step("preprocess_shuttles", &["shuttles"], &["preprocessed_shuttles"])
                .with_tags(["preprocessing"]),
            step(
                "create_model_input",
                &["preprocessed_companies", "preprocessed_shuttles", "reviews"],
                &["model_input"],
            ),
        ])
        .expect("valid pipeline")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{spaceflights, step};
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn steps_are_topologically_ordered() {
        let pipeline = spaceflights();
        assert_eq!(
            pipeline.step_names(),
            vec![
                "preprocess_companies",
                "preprocess_shuttles",
                "create_model_input",
                "report"
            ]
        );

        let levels: Vec<Vec<&str>> = pipeline
            .levels()
            .iter()
            .map(|l| l.iter().map(|s| s.name.as_str()).collect())
            .collect();
        assert_eq!(
            levels,
            vec![
                vec!["preprocess_companies", "preprocess_shuttles"],
                vec!["create_model_input"],
                vec!["report"],
            ]
        );
    }

    #[test]
    fn free_inputs_and_outputs() {
        let pipeline = spaceflights();
        assert_eq!(pipeline.inputs(), set(&["companies", "reviews", "shuttles"]));
        assert_eq!(pipeline.outputs(), set(&["summary"]));
        assert_eq!(pipeline.datasets().len(), 7);
        assert_eq!(pipeline.consumers("model_input").len(), 1);
    }

    #[test]
    fn invalid_steps_are_rejected() {
        let errors = Pipeline::new(vec![
            step("a", &["y"], &["x"]),
            step("b", &["x"], &["y"]),
        ])
        .unwrap_err();
        assert!(matches!(errors[0], ValidationError::CyclicDependency { .. }));

        let errors = Pipeline::new(vec![step("a", &["in"], &["x"]), step("a", &["x"], &["y"])])
            .unwrap_err();
        assert!(matches!(errors[0], ValidationError::DuplicateStepName { .. }));
    }

    #[test]
    fn union_keeps_shared_steps_once() {
        let first = Pipeline::new(vec![step("a", &["raw"], &["x"])]).unwrap();
        let second =
            Pipeline::new(vec![step("a", &["raw"], &["x"]), step("b", &["x"], &["y"])]).unwrap();

        let combined = second.union(&first).unwrap();
        assert_eq!(combined.step_names(), vec!["a", "b"]);

        let clash = Pipeline::new(vec![step("c", &["raw"], &["x"])]).unwrap();
        assert!(first.union(&clash).is_err());
    }

    #[test]
    fn union_rejects_different_steps_with_one_name() {
        let first = Pipeline::new(vec![step("clean", &["raw"], &["x"])]).unwrap();
        let other = Pipeline::new(vec![step("clean", &["other_raw"], &["y"])]).unwrap();

        let errors = first.union(&other).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateStepName {
                step: "clean".into()
            }]
        );

        let retagged = Pipeline::new(vec![step("clean", &["raw"], &["x"]).with_tags(["nightly"])])
            .unwrap();
        assert!(first.union(&retagged).is_err());
    }
}
