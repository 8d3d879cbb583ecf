// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use super::{reject_unknown_args, VersionedPath};
use crate::catalog::Data;
use crate::config::DatasetArgs;
use crate::errors::DatasetError;
use crate::traits::Dataset;

/// Plain UTF-8 text.
pub struct TextDataset {
    path: VersionedPath,
}

impl TextDataset {
    pub fn new(path: VersionedPath) -> Self {
        Self { path }
    }

    pub fn from_args(
        path: VersionedPath,
        load_args: &DatasetArgs,
        save_args: &DatasetArgs,
    ) -> Result<Self, DatasetError> {
        reject_unknown_args(load_args, &[], "text")?;
        reject_unknown_args(save_args, &[], "text")?;
        Ok(Self::new(path))
    }
}

#[async_trait]
impl Dataset for TextDataset {
    async fn load(&self) -> Result<Data, DatasetError> {
        let path = self.path.load_path().await?;
        Ok(Data::Text(tokio::fs::read_to_string(&path).await?))
    }

    async fn save(&self, data: Data) -> Result<(), DatasetError> {
        let Data::Text(text) = data else {
            return Err(DatasetError::Unsupported {
                kind: "text",
                found: data.kind(),
            });
        };
        let path = self.path.save_path().await?;
        tokio::fs::write(path, text).await?;
        Ok(())
    }

    async fn exists(&self) -> bool {
        self.path.exists().await
    }

    fn kind(&self) -> &'static str {
        "text"
    }

    fn describe(&self) -> String {
        format!("text({})", self.path.base().display())
    }
}
