// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors returned by step functions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StepError {
    #[error("Expected {expected} input(s), got {actual}")]
    InputCount { expected: String, actual: usize },

    #[error("Input {index} must be {expected} data, got {found}")]
    TypeMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid option '{option}': {reason}")]
    InvalidOption { option: String, reason: String },

    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    #[error("{0}")]
    Other(String),
}
