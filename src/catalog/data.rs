// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-memory representation of artifact values.

use serde_json::{Map, Value};

use crate::errors::StepError;

/// A value flowing between steps.
///
/// Datasets decide which variants they can persist: `csv` only stores tables,
/// `text` only stores text, `json` and `yaml` store anything.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    Table(Table),
    Json(Value),
    Text(String),
}

impl Data {
    /// Short name of the variant, used in error messages and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Data::Table(_) => "table",
            Data::Json(_) => "json",
            Data::Text(_) => "text",
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Data::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Convert to a JSON value; tables become arrays of row objects
    pub fn to_json(&self) -> Value {
        match self {
            Data::Table(table) => table.to_json(),
            Data::Json(value) => value.clone(),
            Data::Text(text) => Value::String(text.clone()),
        }
    }

    /// Rough size for logging: rows for tables, bytes for text, 1 for JSON scalars
    pub fn size_hint(&self) -> usize {
        match self {
            Data::Table(table) => table.len(),
            Data::Text(text) => text.len(),
            Data::Json(Value::Array(items)) => items.len(),
            Data::Json(Value::Object(map)) => map.len(),
            Data::Json(_) => 1,
        }
    }
}

impl From<Table> for Data {
    fn from(table: Table) -> Self {
        Data::Table(table)
    }
}

impl From<Value> for Data {
    fn from(value: Value) -> Self {
        Data::Json(value)
    }
}

/// A rectangular table of string cells with named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// First `n` rows (all rows when the table is shorter)
    pub fn head(&self, n: usize) -> Table {
        Table::new(
            self.columns.clone(),
            self.rows.iter().take(n).cloned().collect(),
        )
    }

    /// Last `n` rows (all rows when the table is shorter)
    pub fn tail(&self, n: usize) -> Table {
        let skip = self.rows.len().saturating_sub(n);
        Table::new(
            self.columns.clone(),
            self.rows.iter().skip(skip).cloned().collect(),
        )
    }

    /// Project onto the given columns, in the order requested
    pub fn select(&self, columns: &[String]) -> Result<Table, StepError> {
        let indices = columns
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| StepError::UnknownColumn(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rows = self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|&i| row.get(i).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(Table::new(columns.to_vec(), rows))
    }

    /// Keep rows whose `column` cell equals `value`
    pub fn filter_eq(&self, column: &str, value: &str) -> Result<Table, StepError> {
        let index = self
            .column_index(column)
            .ok_or_else(|| StepError::UnknownColumn(column.to_string()))?;

        let rows = self
            .rows
            .iter()
            .filter(|row| row.get(index).map(String::as_str) == Some(value))
            .cloned()
            .collect();

        Ok(Table::new(self.columns.clone(), rows))
    }

    /// Append the rows of `other`; both tables must have identical columns
    pub fn concat(&self, other: &Table) -> Result<Table, StepError> {
        if self.columns != other.columns {
            return Err(StepError::Other(format!(
                "Cannot concatenate tables with different columns: [{}] vs [{}]",
                self.columns.join(", "),
                other.columns.join(", ")
            )));
        }

        let mut rows = self.rows.clone();
        rows.extend(other.rows.iter().cloned());
        Ok(Table::new(self.columns.clone(), rows))
    }

    /// Array of objects keyed by column name
    pub fn to_json(&self) -> Value {
        let records = self
            .rows
            .iter()
            .map(|row| {
                let mut record = Map::new();
                for (i, column) in self.columns.iter().enumerate() {
                    let cell = row.get(i).cloned().unwrap_or_default();
                    record.insert(column.clone(), Value::String(cell));
                }
                Value::Object(record)
            })
            .collect();
        Value::Array(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn companies() -> Table {
        Table::new(
            vec!["id".into(), "company_rating".into(), "iata_approved".into()],
            vec![
                vec!["3888".into(), "100%".into(), "t".into()],
                vec!["46728".into(), "".into(), "f".into()],
                vec!["34618".into(), "38%".into(), "f".into()],
                vec!["28619".into(), "100%".into(), "f".into()],
            ],
        )
    }

    #[test]
    fn head_and_tail_keep_expected_rows() {
        let table = companies();

        let head = table.head(2);
        assert_eq!(head.len(), 2);
        assert_eq!(head.rows[0][0], "3888");
        assert_eq!(head.columns, table.columns);

        let tail = table.tail(1);
        assert_eq!(tail.rows, vec![vec!["28619", "100%", "f"]]);

        assert_eq!(table.head(50).len(), 4);
        assert_eq!(table.tail(50).len(), 4);
    }

    #[test]
    fn select_reorders_and_rejects_unknown_columns() {
        let table = companies();
        let selected = table
            .select(&["iata_approved".to_string(), "id".to_string()])
            .unwrap();
        assert_eq!(selected.columns, vec!["iata_approved", "id"]);
        assert_eq!(selected.rows[0], vec!["t", "3888"]);

        let err = table.select(&["missing".to_string()]).unwrap_err();
        assert_eq!(err, StepError::UnknownColumn("missing".into()));
    }

    #[test]
    fn filter_eq_matches_exact_cells() {
        let filtered = companies().filter_eq("company_rating", "100%").unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(companies().filter_eq("nope", "x").is_err());
    }

    #[test]
    fn concat_requires_matching_columns() {
        let table = companies();
        let doubled = table.concat(&table).unwrap();
        assert_eq!(doubled.len(), 8);

        let other = Table::new(vec!["id".into()], vec![]);
        assert!(table.concat(&other).is_err());
    }

    #[test]
    fn to_json_produces_records() {
        let json = companies().head(1).to_json();
        assert_eq!(
            json,
            serde_json::json!([{"id": "3888", "company_rating": "100%", "iata_approved": "t"}])
        );
    }
}
