// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::catalog::Data;
use crate::errors::DatasetError;
use crate::traits::Dataset;

/// Holds data in memory for the lifetime of a run.
///
/// Loads hand out copies so a step cannot mutate what another step sees.
#[derive(Default)]
pub struct MemoryDataset {
    data: RwLock<Option<Data>>,
}

impl MemoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: Data) -> Self {
        Self {
            data: RwLock::new(Some(data)),
        }
    }
}

#[async_trait]
impl Dataset for MemoryDataset {
    async fn load(&self) -> Result<Data, DatasetError> {
        self.data.read().await.clone().ok_or(DatasetError::NotSaved)
    }

    async fn save(&self, data: Data) -> Result<(), DatasetError> {
        *self.data.write().await = Some(data);
        Ok(())
    }

    async fn exists(&self) -> bool {
        self.data.read().await.is_some()
    }

    async fn release(&self) {
        *self.data.write().await = None;
    }

    fn kind(&self) -> &'static str {
        "memory"
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
