// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// Function-specific options attached to a step
pub type StepOptions = HashMap<String, serde_yaml::Value>;

/// One pipeline definition (`conf/<env>/pipelines/<name>.yml`).
///
/// # Example
/// ```yaml
/// steps:
///   - name: keep_first_rows
///     func: head
///     inputs: companies
///     outputs: preprocessed_companies
///     tags: [preprocessing]
///     options:
///       n: 5
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

/// Configuration of a single step.
///
/// `inputs`, `outputs` and `tags` accept either a single string or a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepConfig {
    pub name: String,
    pub func: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub inputs: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub outputs: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub options: StepOptions,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    })
}
