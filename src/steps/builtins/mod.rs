// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod concat;
pub mod filter_rows;
pub mod identity;
pub mod row_count;
pub mod row_slice;
pub mod select_columns;
pub mod to_json;

pub use concat::ConcatStep;
pub use filter_rows::FilterRowsStep;
pub use identity::IdentityStep;
pub use row_count::RowCountStep;
pub use row_slice::RowSliceStep;
pub use select_columns::SelectColumnsStep;
pub use to_json::ToJsonStep;

use serde_yaml::Value;

use crate::catalog::{Data, Table};
use crate::config::StepOptions;
use crate::errors::StepError;

/// Fail unless `inputs` holds between `min` and `max` values
pub(crate) fn expect_input_count(
    inputs: &[Data],
    min: usize,
    max: Option<usize>,
) -> Result<(), StepError> {
    let actual = inputs.len();
    let fits = actual >= min && max.map_or(true, |max| actual <= max);
    if fits {
        return Ok(());
    }

    let expected = match max {
        Some(max) if max == min => min.to_string(),
        Some(max) => format!("{} to {}", min, max),
        None => format!("at least {}", min),
    };
    Err(StepError::InputCount { expected, actual })
}

pub(crate) fn table_at(inputs: &[Data], index: usize) -> Result<&Table, StepError> {
    match inputs.get(index) {
        Some(Data::Table(table)) => Ok(table),
        Some(other) => Err(StepError::TypeMismatch {
            index,
            expected: "table",
            found: other.kind(),
        }),
        None => Err(StepError::InputCount {
            expected: format!("at least {}", index + 1),
            actual: inputs.len(),
        }),
    }
}

/// Scalar option rendered as a string, so `value: 100` and `value: "100"` agree
pub(crate) fn string_option(options: &StepOptions, key: &str) -> Result<String, StepError> {
    match options.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) => Err(invalid(key, "must be a scalar")),
        None => Err(invalid(key, "is required")),
    }
}

pub(crate) fn string_list_option(
    options: &StepOptions,
    key: &str,
) -> Result<Vec<String>, StepError> {
    match options.get(key) {
        Some(Value::String(s)) => Ok(vec![s.clone()]),
        Some(Value::Sequence(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid(key, "must be a list of strings"))
            })
            .collect(),
        Some(_) => Err(invalid(key, "must be a list of strings")),
        None => Err(invalid(key, "is required")),
    }
}

pub(crate) fn usize_option(options: &StepOptions, key: &str) -> Result<Option<usize>, StepError> {
    match options.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_u64()
            .map(|n| Some(n as usize))
            .ok_or_else(|| invalid(key, "must be a non-negative integer")),
    }
}

fn invalid(key: &str, reason: &str) -> StepError {
    StepError::InvalidOption {
        option: key.to_string(),
        reason: reason.to_string(),
    }
}
