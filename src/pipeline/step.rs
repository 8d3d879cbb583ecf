// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::catalog::Data;
use crate::config::{StepOptions, StepShape};
use crate::errors::StepError;
use crate::traits::StepFunction;

/// A function bound to named input and output artifacts.
#[derive(Clone)]
pub struct Step {
    pub name: String,
    pub function: Arc<dyn StepFunction>,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub tags: BTreeSet<String>,
    pub options: StepOptions,
}

impl Step {
    pub fn new<I, O>(name: &str, function: Arc<dyn StepFunction>, inputs: I, outputs: O) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            name: name.to_string(),
            function,
            inputs: inputs.into_iter().map(Into::into).collect(),
            outputs: outputs.into_iter().map(Into::into).collect(),
            tags: BTreeSet::new(),
            options: StepOptions::new(),
        }
    }

    pub fn with_tags<T>(mut self, tags: T) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_options(mut self, options: StepOptions) -> Self {
        self.options = options;
        self
    }

    /// Name of the registered function this step calls
    pub fn func_name(&self) -> &'static str {
        self.function.name()
    }

    /// Same name bound to the same function, artifacts, tags and options
    pub fn same_definition(&self, other: &Step) -> bool {
        self.name == other.name
            && self.func_name() == other.func_name()
            && self.inputs == other.inputs
            && self.outputs == other.outputs
            && self.tags == other.tags
            && self.options == other.options
    }

    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        tags.iter().any(|t| self.tags.contains(t))
    }

    /// Invoke the function with this step's options
    pub async fn call(&self, inputs: Vec<Data>) -> Result<Vec<Data>, StepError> {
        self.function.call(inputs, &self.options).await
    }
}

impl StepShape for Step {
    fn step_name(&self) -> &str {
        &self.name
    }

    fn step_inputs(&self) -> &[String] {
        &self.inputs
    }

    fn step_outputs(&self) -> &[String] {
        &self.outputs
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("func", &self.func_name())
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("tags", &self.tags)
            .finish()
    }
}

/// `name: func([inputs]) -> [outputs]`
impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}([{}]) -> [{}]",
            self.name,
            self.func_name(),
            self.inputs.join(","),
            self.outputs.join(",")
        )
    }
}
