//! StorageConfig: which document store backs the catalog, and where.

use crate::config::paths;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local store, lost on exit; for tests and embedding
    Memory,
    /// Sled database on disk
    Sled,
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Sled database directory; None means the platform data directory
    pub path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sled,
            path: None,
        }
    }
}

impl StorageConfig {
    /// Process-local storage; nothing outlives the process
    pub fn in_memory() -> Self {
        Self {
            backend: StorageBackend::Memory,
            path: None,
        }
    }

    /// Resolve the sled database directory
    pub fn resolve_path(&self) -> Result<PathBuf, ApiError> {
        match &self.path {
            Some(path) if !path.as_os_str().is_empty() => Ok(path.clone()),
            _ => Ok(paths::data_dir()?.join("store")),
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(path) = &self.path {
            if self.backend == StorageBackend::Memory && !path.as_os_str().is_empty() {
                tracing::warn!(
                    "storage.path {} is ignored by the memory backend",
                    path.display()
                );
            }
        }
        Ok(())
    }
}
