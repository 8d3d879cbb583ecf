// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Path resolution for plain and versioned file datasets.
//!
//! A versioned dataset at `data/06_models/model.json` is stored as
//! `data/06_models/model.json/<version>/model.json`, where `<version>` is a UTC
//! timestamp that sorts lexicographically in time order.

use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::errors::DatasetError;

/// Format of version directory names, e.g. `2024-05-01T10.15.42.123Z`
pub const VERSION_FORMAT: &str = "%Y-%m-%dT%H.%M.%S%.3fZ";

#[derive(Debug, Clone, PartialEq)]
pub struct VersionedPath {
    path: PathBuf,
    versioned: bool,
    load_version: Option<String>,
}

impl VersionedPath {
    pub fn plain(path: PathBuf) -> Self {
        Self {
            path,
            versioned: false,
            load_version: None,
        }
    }

    pub fn versioned(path: PathBuf, load_version: Option<String>) -> Self {
        Self {
            path,
            versioned: true,
            load_version,
        }
    }

    pub fn base(&self) -> &Path {
        &self.path
    }

    pub fn is_versioned(&self) -> bool {
        self.versioned
    }

    /// A fresh version stamp
    pub fn generate_version() -> String {
        Utc::now().format(VERSION_FORMAT).to_string()
    }

    /// Path to read from: the pinned version, else the latest saved version
    pub async fn load_path(&self) -> Result<PathBuf, DatasetError> {
        if !self.versioned {
            return Ok(self.path.clone());
        }

        let version = match &self.load_version {
            Some(version) => version.clone(),
            None => self
                .latest_version()
                .await?
                .ok_or_else(|| DatasetError::NoVersionFound(self.path.clone()))?,
        };
        Ok(self.version_path(&version))
    }

    /// Path to write to, with parent directories created
    pub async fn save_path(&self) -> Result<PathBuf, DatasetError> {
        if self.versioned {
            return self.claim_version(&Self::generate_version()).await;
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(self.path.clone())
    }

    /// Creates the directory for `version`; an existing one is never reused
    async fn claim_version(&self, version: &str) -> Result<PathBuf, DatasetError> {
        tokio::fs::create_dir_all(&self.path).await?;
        let version_dir = self.path.join(version);
        match tokio::fs::create_dir(&version_dir).await {
            Ok(()) => Ok(self.version_path(version)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(DatasetError::VersionExists(version_dir))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn exists(&self) -> bool {
        match self.load_path().await {
            Ok(path) => tokio::fs::metadata(path)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    fn version_path(&self, version: &str) -> PathBuf {
        let file_name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        self.path.join(version).join(file_name)
    }

    /// Greatest version directory that actually contains the data file
    async fn latest_version(&self) -> Result<Option<String>, DatasetError> {
        let mut entries = match tokio::fs::read_dir(&self.path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut latest: Option<String> = None;
        while let Some(entry) = entries.next_entry().await? {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !tokio::fs::try_exists(self.version_path(&name)).await.unwrap_or(false) {
                continue;
            }
            if latest.as_ref().map_or(true, |current| name > *current) {
                latest = Some(name);
            }
        }

        Ok(latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn plain_paths_are_used_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let vp = VersionedPath::plain(path.clone());

        assert_eq!(vp.load_path().await.unwrap(), path);
        assert_eq!(vp.save_path().await.unwrap(), path);
        assert!(dir.path().join("nested").is_dir());
        assert!(!vp.exists().await);
    }

    #[tokio::test]
    async fn latest_version_wins() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("model.json");
        for version in ["2024-01-01T00.00.00.000Z", "2024-03-01T00.00.00.000Z"] {
            let version_dir = base.join(version);
            std::fs::create_dir_all(&version_dir).unwrap();
            std::fs::write(version_dir.join("model.json"), "{}").unwrap();
        }
        // A directory without the data file is ignored
        std::fs::create_dir_all(base.join("2099-01-01T00.00.00.000Z")).unwrap();

        let vp = VersionedPath::versioned(base.clone(), None);
        assert_eq!(
            vp.load_path().await.unwrap(),
            base.join("2024-03-01T00.00.00.000Z").join("model.json")
        );
        assert!(vp.exists().await);

        let pinned = VersionedPath::versioned(base.clone(), Some("2024-01-01T00.00.00.000Z".into()));
        assert_eq!(
            pinned.load_path().await.unwrap(),
            base.join("2024-01-01T00.00.00.000Z").join("model.json")
        );
    }

    #[tokio::test]
    async fn missing_versions_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let vp = VersionedPath::versioned(dir.path().join("model.json"), None);
        assert!(matches!(
            vp.load_path().await,
            Err(DatasetError::NoVersionFound(_))
        ));
        assert!(!vp.exists().await);
    }

    #[tokio::test]
    async fn same_version_is_never_written_twice() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("model.json");
        let vp = VersionedPath::versioned(base.clone(), None);
        let version = "2024-05-01T10.15.42.123Z";

        let first = vp.claim_version(version).await.unwrap();
        assert_eq!(first, base.join(version).join("model.json"));
        std::fs::write(&first, "{\"run\": 1}").unwrap();

        match vp.claim_version(version).await {
            Err(DatasetError::VersionExists(path)) => assert_eq!(path, base.join(version)),
            other => panic!("expected VersionExists, got {other:?}"),
        }
        assert_eq!(std::fs::read_to_string(&first).unwrap(), "{\"run\": 1}");
    }

    #[tokio::test]
    async fn versioned_save_paths_are_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("model.json");
        let vp = VersionedPath::versioned(base.clone(), None);

        let path = vp.save_path().await.unwrap();
        assert!(path.starts_with(&base));
        assert!(path.parent().unwrap().is_dir());
        assert_eq!(path.file_name().unwrap(), "model.json");
    }

    #[test]
    fn version_stamps_sort_in_time_order() {
        let version = VersionedPath::generate_version();
        assert_eq!(version.len(), "2024-01-01T00.00.00.000Z".len());
        assert!(version.ends_with('Z'));
    }
}
