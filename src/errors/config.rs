// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

use super::CatalogError;

/// Errors that can occur while validating a pipeline's dependency structure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A circular dependency was detected between steps via shared artifacts
    #[error("Cyclic dependency detected: {}", .cycle.join(" -> "))]
    CyclicDependency {
        /// The cycle path, expressed as step names, closed on its first element
        cycle: Vec<String>,
    },

    /// Two steps share the same name
    #[error("Duplicate step name: '{step}'")]
    DuplicateStepName { step: String },

    /// An artifact is produced by more than one step
    #[error("Artifact '{artifact}' is produced by more than one step: {}", .producers.join(", "))]
    OutputNotUnique {
        artifact: String,
        producers: Vec<String>,
    },

    /// A step names a function that is not in the step registry
    #[error("Step '{step}' uses unknown function '{func}'")]
    UnknownFunction { step: String, func: String },

    /// Pipeline inputs that are neither produced by a step nor present in the catalog
    #[error("Pipeline input(s) {} not found in the data catalog", format_names(.inputs))]
    UnresolvedInputs { inputs: Vec<String> },
}

fn format_names(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{}'", n)).collect();
    format!("{{{}}}", quoted.join(", "))
}

/// Errors raised while reading project configuration from disk
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in '{}': {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid project settings in '{}': {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The directory has no `conduit.toml`
    #[error("'{}' is not a conduit project (no conduit.toml found)", .0.display())]
    NotAProject(PathBuf),

    /// The same top-level key appears in two files of one environment
    #[error(
        "Duplicate key '{key}' in environment '{env}' ({} and {})",
        .first.display(),
        .second.display()
    )]
    DuplicateKey {
        key: String,
        env: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A top-level key that is not a string, such as `1:` or `true:`
    #[error("Top-level key {key} in '{}' must be a string", .path.display())]
    NonStringKey { key: String, path: PathBuf },

    /// A catalog entry cannot be turned into a dataset
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Pipeline '{0}' is not registered")]
    UnknownPipeline(String),

    /// Pipeline definitions that fail validation, one message per problem
    #[error("Configuration validation failed:\n{}", join_lines(.0))]
    Validation(Vec<ValidationError>),
}

fn join_lines(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyclic_dependency_message_shows_path() {
        let error = ValidationError::CyclicDependency {
            cycle: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(error.to_string(), "Cyclic dependency detected: a -> b -> a");
    }

    #[test]
    fn unresolved_inputs_message_lists_names() {
        let error = ValidationError::UnresolvedInputs {
            inputs: vec!["companies".into(), "shuttles".into()],
        };
        assert_eq!(
            error.to_string(),
            "Pipeline input(s) {'companies', 'shuttles'} not found in the data catalog"
        );
    }

    #[test]
    fn validation_config_error_joins_messages() {
        let error = ConfigError::Validation(vec![
            ValidationError::DuplicateStepName { step: "a".into() },
            ValidationError::UnknownFunction {
                step: "b".into(),
                func: "nope".into(),
            },
        ]);
        let message = error.to_string();
        assert!(message.contains("Duplicate step name: 'a'"));
        assert!(message.contains("Step 'b' uses unknown function 'nope'"));
    }
}
