// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod csv;
pub mod json;
pub mod memory;
pub mod text;
pub mod versioning;
pub mod yaml;

pub use self::csv::{CsvDataset, CsvOptions};
pub use self::json::JsonDataset;
pub use self::memory::MemoryDataset;
pub use self::text::TextDataset;
pub use self::versioning::VersionedPath;
pub use self::yaml::YamlDataset;

use crate::config::DatasetArgs;
use crate::errors::DatasetError;

/// Read a boolean argument, falling back to `default` when absent
pub(crate) fn bool_arg(args: &DatasetArgs, key: &str, default: bool) -> Result<bool, DatasetError> {
    match args.get(key) {
        None => Ok(default),
        Some(value) => value
            .as_bool()
            .ok_or_else(|| DatasetError::InvalidArgument(format!("'{}' must be a boolean", key))),
    }
}

/// Reject arguments the dataset does not understand
pub(crate) fn reject_unknown_args(
    args: &DatasetArgs,
    known: &[&str],
    kind: &str,
) -> Result<(), DatasetError> {
    let mut unknown: Vec<&String> = args.keys().filter(|k| !known.contains(&k.as_str())).collect();
    if unknown.is_empty() {
        return Ok(());
    }
    unknown.sort();
    Err(DatasetError::InvalidArgument(format!(
        "{} dataset does not accept argument(s): {}",
        kind,
        unknown
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    )))
}
