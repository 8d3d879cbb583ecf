// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::catalog::Data;
use crate::errors::DatasetError;

/// Storage behind a catalog entry.
///
/// Implementations synchronize internally; the catalog hands out shared
/// `Arc<dyn Dataset>` handles to concurrently running steps.
#[async_trait]
pub trait Dataset: Send + Sync {
    async fn load(&self) -> Result<Data, DatasetError>;

    async fn save(&self, data: Data) -> Result<(), DatasetError>;

    async fn exists(&self) -> bool;

    /// Drop any cached data. File datasets have nothing to release.
    async fn release(&self) {}

    /// Dataset type name as written in catalog configuration
    fn kind(&self) -> &'static str;

    /// Human readable description (type and location)
    fn describe(&self) -> String;
}
