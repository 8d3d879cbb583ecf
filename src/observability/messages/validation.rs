// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pipeline validation failures.
//!
//! This module contains message types for logging events related to:
//! * Cyclic dependency detection
//! * Duplicate step names
//! * Artifacts with more than one producer
//! * Pipeline inputs missing from the catalog

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Cyclic dependency detected between steps.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_conduit::observability::messages::validation::CyclicDependencyDetected;
///
/// let cycle = vec!["clean", "join", "clean"];
/// let msg = CyclicDependencyDetected {
///     cycle: &cycle,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct CyclicDependencyDetected<'a> {
    pub cycle: &'a [&'a str],
}

impl Display for CyclicDependencyDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Cyclic dependency detected: {}", self.cycle.join(" -> "))
    }
}

impl StructuredLog for CyclicDependencyDetected<'_> {
    fn log(&self) {
        tracing::error!(
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "cyclic_dependency",
            span_name = name,
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
        )
    }
}

/// Two steps share a name.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct DuplicateStepName<'a> {
    pub step: &'a str,
}

impl Display for DuplicateStepName<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Duplicate step name: '{}'", self.step)
    }
}

impl StructuredLog for DuplicateStepName<'_> {
    fn log(&self) {
        tracing::error!(step = self.step, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("duplicate_step_name", span_name = name, step = self.step)
    }
}

/// An artifact is written by several steps.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct OutputNotUnique<'a> {
    pub artifact: &'a str,
    pub producers: &'a [String],
}

impl Display for OutputNotUnique<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Artifact '{}' is produced by more than one step: {}",
            self.artifact,
            self.producers.join(", ")
        )
    }
}

impl StructuredLog for OutputNotUnique<'_> {
    fn log(&self) {
        tracing::error!(
            artifact = self.artifact,
            producers = self.producers.join(", "),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "output_not_unique",
            span_name = name,
            artifact = self.artifact,
            producer_count = self.producers.len(),
        )
    }
}

pub struct UnresolvedInputs<'a> {
    pub inputs: &'a [String],
}

impl Display for UnresolvedInputs<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline inputs missing from the data catalog: {}",
            self.inputs.join(", ")
        )
    }
}

impl StructuredLog for UnresolvedInputs<'_> {
    fn log(&self) {
        tracing::error!(inputs = self.inputs.join(", "), "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "unresolved_inputs",
            span_name = name,
            input_count = self.inputs.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_not_unique_lists_producers() {
        let producers = vec!["a".to_string(), "b".to_string()];
        let msg = OutputNotUnique {
            artifact: "x",
            producers: &producers,
        };
        assert_eq!(
            msg.to_string(),
            "Artifact 'x' is produced by more than one step: a, b"
        );
    }
}
