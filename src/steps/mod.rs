// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Step functions and the registry that pipeline configuration resolves
//! `func:` names against.

pub mod builtins;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::traits::StepFunction;
use builtins::*;

/// Functions available to pipelines, keyed by name.
#[derive(Clone, Default)]
pub struct StepRegistry {
    functions: BTreeMap<String, Arc<dyn StepFunction>>,
}

impl StepRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in function:
    /// - "head" / "tail" -> RowSliceStep
    /// - "select_columns" -> SelectColumnsStep
    /// - "filter_rows" -> FilterRowsStep
    /// - "concat" -> ConcatStep
    /// - "row_count" -> RowCountStep
    /// - "identity" -> IdentityStep
    /// - "to_json" -> ToJsonStep
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(RowSliceStep::head()));
        registry.register(Arc::new(RowSliceStep::tail()));
        registry.register(Arc::new(SelectColumnsStep));
        registry.register(Arc::new(FilterRowsStep));
        registry.register(Arc::new(ConcatStep));
        registry.register(Arc::new(RowCountStep));
        registry.register(Arc::new(IdentityStep));
        registry.register(Arc::new(ToJsonStep));
        registry
    }

    /// Add a function under its own name, replacing any previous one
    pub fn register(&mut self, function: Arc<dyn StepFunction>) {
        self.functions.insert(function.name().to_string(), function);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn StepFunction>> {
        self.functions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.functions.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Data;
    use crate::config::StepOptions;
    use crate::errors::StepError;
    use async_trait::async_trait;

    struct Shout;

    #[async_trait]
    impl StepFunction for Shout {
        async fn call(
            &self,
            inputs: Vec<Data>,
            _options: &StepOptions,
        ) -> Result<Vec<Data>, StepError> {
            Ok(inputs
                .into_iter()
                .map(|d| match d {
                    Data::Text(t) => Data::Text(t.to_uppercase()),
                    other => other,
                })
                .collect())
        }

        fn name(&self) -> &'static str {
            "shout"
        }
    }

    #[test]
    fn builtins_are_sorted_by_name() {
        let registry = StepRegistry::with_builtins();
        assert_eq!(
            registry.names(),
            vec![
                "concat",
                "filter_rows",
                "head",
                "identity",
                "row_count",
                "select_columns",
                "tail",
                "to_json"
            ]
        );
        assert!(registry.contains("head"));
        assert!(registry.get("train_model").is_none());
    }

    #[tokio::test]
    async fn custom_functions_can_be_registered() {
        let mut registry = StepRegistry::with_builtins();
        registry.register(Arc::new(Shout));

        let shout = registry.get("shout").unwrap();
        let out = shout
            .call(vec![Data::Text("hi".into())], &StepOptions::new())
            .await
            .unwrap();
        assert_eq!(out, vec![Data::Text("HI".into())]);
    }
}
