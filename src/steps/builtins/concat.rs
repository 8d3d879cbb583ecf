// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use super::{expect_input_count, table_at};
use crate::catalog::Data;
use crate::config::StepOptions;
use crate::errors::StepError;
use crate::traits::StepFunction;

/// Stacks every input table, in input order. Columns must match.
pub struct ConcatStep;

#[async_trait]
impl StepFunction for ConcatStep {
    async fn call(&self, inputs: Vec<Data>, _options: &StepOptions) -> Result<Vec<Data>, StepError> {
        expect_input_count(&inputs, 1, None)?;

        let mut combined = table_at(&inputs, 0)?.clone();
        for index in 1..inputs.len() {
            combined = combined.concat(table_at(&inputs, index)?)?;
        }
        Ok(vec![Data::Table(combined)])
    }

    fn name(&self) -> &'static str {
        "concat"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Table;

    fn one_row(id: &str) -> Data {
        Data::Table(Table::new(vec!["id".into()], vec![vec![id.into()]]))
    }

    #[tokio::test]
    async fn stacks_tables_in_order() {
        let out = ConcatStep
            .call(vec![one_row("a"), one_row("b"), one_row("c")], &StepOptions::new())
            .await
            .unwrap();
        let table = out[0].as_table().unwrap();
        assert_eq!(table.rows, vec![vec!["a"], vec!["b"], vec!["c"]]);
    }

    #[tokio::test]
    async fn rejects_non_table_input() {
        let err = ConcatStep
            .call(vec![one_row("a"), Data::Text("b".into())], &StepOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StepError::TypeMismatch { index: 1, .. }));
    }
}
