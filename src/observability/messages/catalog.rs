// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for data catalog events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Loading an artifact from its dataset.
///
/// # Example
/// ```
/// use the_conduit::observability::messages::catalog::DatasetLoading;
///
/// let msg = DatasetLoading {
///     name: "companies",
///     dataset: "csv(data/01_raw/companies.csv)",
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Loading data from 'companies' (csv(data/01_raw/companies.csv))"
/// );
/// ```
pub struct DatasetLoading<'a> {
    pub name: &'a str,
    pub dataset: &'a str,
}

impl Display for DatasetLoading<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Loading data from '{}' ({})", self.name, self.dataset)
    }
}

impl StructuredLog for DatasetLoading<'_> {
    fn log(&self) {
        tracing::info!(artifact = self.name, dataset = self.dataset, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "dataset_load",
            span_name = name,
            artifact = self.name,
            dataset = self.dataset,
        )
    }
}

/// Saving a step output into its dataset.
pub struct DatasetSaving<'a> {
    pub name: &'a str,
    pub dataset: &'a str,
    pub size: usize,
}

impl Display for DatasetSaving<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Saving data to '{}' ({})", self.name, self.dataset)
    }
}

impl StructuredLog for DatasetSaving<'_> {
    fn log(&self) {
        tracing::info!(
            artifact = self.name,
            dataset = self.dataset,
            size = self.size,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "dataset_save",
            span_name = name,
            artifact = self.name,
            dataset = self.dataset,
        )
    }
}

/// A memory artifact dropped after its last consumer.
pub struct DatasetReleased<'a> {
    pub name: &'a str,
}

impl Display for DatasetReleased<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Released '{}'", self.name)
    }
}

impl StructuredLog for DatasetReleased<'_> {
    fn log(&self) {
        tracing::debug!(artifact = self.name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("dataset_release", span_name = name, artifact = self.name)
    }
}

/// An artifact name matched a dataset factory pattern.
pub struct PatternResolved<'a> {
    pub name: &'a str,
    pub pattern: &'a str,
}

impl Display for PatternResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Resolved '{}' from dataset factory pattern '{}'",
            self.name, self.pattern
        )
    }
}

impl StructuredLog for PatternResolved<'_> {
    fn log(&self) {
        tracing::debug!(artifact = self.name, pattern = self.pattern, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "pattern_resolved",
            span_name = name,
            artifact = self.name,
            pattern = self.pattern,
        )
    }
}

/// An undeclared artifact is backed by a fresh memory dataset.
pub struct MemoryDatasetCreated<'a> {
    pub name: &'a str,
}

impl Display for MemoryDatasetCreated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Using memory dataset for undeclared artifact '{}'", self.name)
    }
}

impl StructuredLog for MemoryDatasetCreated<'_> {
    fn log(&self) {
        tracing::debug!(artifact = self.name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("memory_dataset", span_name = name, artifact = self.name)
    }
}
