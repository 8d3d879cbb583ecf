// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use super::{bool_arg, reject_unknown_args, VersionedPath};
use crate::catalog::Data;
use crate::config::DatasetArgs;
use crate::errors::DatasetError;
use crate::traits::Dataset;

/// Any data serialized as JSON. Tables are written as arrays of row objects
/// and come back as JSON.
pub struct JsonDataset {
    path: VersionedPath,
    pretty: bool,
}

impl JsonDataset {
    pub fn new(path: VersionedPath, pretty: bool) -> Self {
        Self { path, pretty }
    }

    pub fn from_args(
        path: VersionedPath,
        load_args: &DatasetArgs,
        save_args: &DatasetArgs,
    ) -> Result<Self, DatasetError> {
        reject_unknown_args(load_args, &[], "json")?;
        reject_unknown_args(save_args, &["pretty"], "json")?;
        Ok(Self::new(path, bool_arg(save_args, "pretty", true)?))
    }
}

#[async_trait]
impl Dataset for JsonDataset {
    async fn load(&self) -> Result<Data, DatasetError> {
        let path = self.path.load_path().await?;
        let bytes = tokio::fs::read(&path).await?;
        Ok(Data::Json(serde_json::from_slice(&bytes)?))
    }

    async fn save(&self, data: Data) -> Result<(), DatasetError> {
        let value = data.to_json();
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&value)?
        } else {
            serde_json::to_vec(&value)?
        };
        let path = self.path.save_path().await?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    async fn exists(&self) -> bool {
        self.path.exists().await
    }

    fn kind(&self) -> &'static str {
        "json"
    }

    fn describe(&self) -> String {
        format!(
            "json({}{})",
            self.path.base().display(),
            if self.path.is_versioned() { ", versioned" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Table;
    use serde_json::json;

    #[tokio::test]
    async fn tables_are_saved_as_records() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = JsonDataset::new(VersionedPath::plain(dir.path().join("out.json")), false);
        let table = Table::new(vec!["id".into()], vec![vec!["7".into()]]);

        dataset.save(Data::Table(table)).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("out.json")).unwrap(),
            r#"[{"id":"7"}]"#
        );
        assert_eq!(dataset.load().await.unwrap(), Data::Json(json!([{"id": "7"}])));
    }

    #[tokio::test]
    async fn versioned_saves_load_latest() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("metrics.json");
        let dataset = JsonDataset::new(VersionedPath::versioned(base.clone(), None), true);

        dataset.save(Data::Json(json!({"run": 1}))).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        dataset.save(Data::Json(json!({"run": 2}))).await.unwrap();

        assert_eq!(dataset.load().await.unwrap(), Data::Json(json!({"run": 2})));
        assert_eq!(std::fs::read_dir(&base).unwrap().count(), 2);
    }
}
