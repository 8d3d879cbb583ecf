// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use super::{reject_unknown_args, VersionedPath};
use crate::catalog::Data;
use crate::config::DatasetArgs;
use crate::errors::DatasetError;
use crate::traits::Dataset;

/// Any data serialized as YAML; loads come back as JSON values.
pub struct YamlDataset {
    path: VersionedPath,
}

impl YamlDataset {
    pub fn new(path: VersionedPath) -> Self {
        Self { path }
    }

    pub fn from_args(
        path: VersionedPath,
        load_args: &DatasetArgs,
        save_args: &DatasetArgs,
    ) -> Result<Self, DatasetError> {
        reject_unknown_args(load_args, &[], "yaml")?;
        reject_unknown_args(save_args, &[], "yaml")?;
        Ok(Self::new(path))
    }
}

#[async_trait]
impl Dataset for YamlDataset {
    async fn load(&self) -> Result<Data, DatasetError> {
        let path = self.path.load_path().await?;
        let content = tokio::fs::read_to_string(&path).await?;
        Ok(Data::Json(serde_yaml::from_str(&content)?))
    }

    async fn save(&self, data: Data) -> Result<(), DatasetError> {
        let content = serde_yaml::to_string(&data.to_json())?;
        let path = self.path.save_path().await?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    async fn exists(&self) -> bool {
        self.path.exists().await
    }

    fn kind(&self) -> &'static str {
        "yaml"
    }

    fn describe(&self) -> String {
        format!("yaml({})", self.path.base().display())
    }
}
