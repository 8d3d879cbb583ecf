// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use super::{bool_arg, reject_unknown_args, VersionedPath};
use crate::catalog::{Data, Table};
use crate::config::DatasetArgs;
use crate::errors::DatasetError;
use crate::traits::Dataset;

/// Parsed `load_args` / `save_args` of a CSV dataset.
///
/// # Fields
/// * `load_delimiter` / `save_delimiter` - Single ASCII field separator, default `,`
/// * `has_header` - Whether the first row names the columns when loading, default `true`.
///   Without a header, columns are named `column_0`, `column_1`, ...
/// * `write_header` - Whether to write the header row when saving, default `true`
#[derive(Debug, Clone, PartialEq)]
pub struct CsvOptions {
    pub load_delimiter: u8,
    pub save_delimiter: u8,
    pub has_header: bool,
    pub write_header: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            load_delimiter: b',',
            save_delimiter: b',',
            has_header: true,
            write_header: true,
        }
    }
}

impl CsvOptions {
    pub fn from_args(load_args: &DatasetArgs, save_args: &DatasetArgs) -> Result<Self, DatasetError> {
        reject_unknown_args(load_args, &["delimiter", "has_header"], "csv")?;
        reject_unknown_args(save_args, &["delimiter", "header"], "csv")?;

        Ok(Self {
            load_delimiter: delimiter(load_args)?,
            save_delimiter: delimiter(save_args)?,
            has_header: bool_arg(load_args, "has_header", true)?,
            write_header: bool_arg(save_args, "header", true)?,
        })
    }
}

fn delimiter(args: &DatasetArgs) -> Result<u8, DatasetError> {
    let Some(value) = args.get("delimiter") else {
        return Ok(b',');
    };
    let text = value
        .as_str()
        .ok_or_else(|| DatasetError::InvalidArgument("'delimiter' must be a string".into()))?;
    match text.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(DatasetError::InvalidArgument(format!(
            "'delimiter' must be a single ASCII character, got '{}'",
            text
        ))),
    }
}

/// Tabular data stored as delimited text.
pub struct CsvDataset {
    path: VersionedPath,
    options: CsvOptions,
}

impl CsvDataset {
    pub fn new(path: VersionedPath, options: CsvOptions) -> Self {
        Self { path, options }
    }

    pub fn from_args(
        path: VersionedPath,
        load_args: &DatasetArgs,
        save_args: &DatasetArgs,
    ) -> Result<Self, DatasetError> {
        Ok(Self::new(path, CsvOptions::from_args(load_args, save_args)?))
    }

    pub fn parse(&self, bytes: &[u8]) -> Result<Table, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.options.load_delimiter)
            .has_headers(self.options.has_header)
            .flexible(true)
            .from_reader(bytes);

        let mut columns: Vec<String> = if self.options.has_header {
            reader.headers()?.iter().map(str::to_string).collect()
        } else {
            Vec::new()
        };

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        if !self.options.has_header {
            let width = rows.iter().map(Vec::len).max().unwrap_or(0);
            columns = (0..width).map(|i| format!("column_{}", i)).collect();
        }

        Ok(Table::new(columns, rows))
    }

    pub fn render(&self, table: &Table) -> Result<Vec<u8>, DatasetError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.options.save_delimiter)
            .flexible(true)
            .from_writer(Vec::new());

        if self.options.write_header {
            writer.write_record(&table.columns)?;
        }
        for row in &table.rows {
            writer.write_record(row)?;
        }

        writer
            .into_inner()
            .map_err(|e| DatasetError::Io(e.into_error()))
    }
}

#[async_trait]
impl Dataset for CsvDataset {
    async fn load(&self) -> Result<Data, DatasetError> {
        let path = self.path.load_path().await?;
        let bytes = tokio::fs::read(&path).await?;
        Ok(Data::Table(self.parse(&bytes)?))
    }

    async fn save(&self, data: Data) -> Result<(), DatasetError> {
        let Data::Table(table) = &data else {
            return Err(DatasetError::Unsupported {
                kind: "csv",
                found: data.kind(),
            });
        };
        let bytes = self.render(table)?;
        let path = self.path.save_path().await?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    async fn exists(&self) -> bool {
        self.path.exists().await
    }

    fn kind(&self) -> &'static str {
        "csv"
    }

    fn describe(&self) -> String {
        format!(
            "csv({}{})",
            self.path.base().display(),
            if self.path.is_versioned() { ", versioned" } else { "" }
        )
    }
}
