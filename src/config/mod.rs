//! Configuration
//!
//! Layered settings for the catalog service: built-in defaults, an optional
//! TOML file, then `CATALOG__*` environment variables (highest precedence).

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod storage;

use crate::agent::{AgentIdentity, AgentRole};
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::types::SERVICE_CATALOG_DOCUMENT_KEY;
use serde::{Deserialize, Serialize};

pub use facade::ConfigLoader;
pub use storage::{StorageBackend, StorageConfig};

/// Catalog document settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Key of the shared catalog document
    pub document_key: String,

    /// Skip the store when a mutation leaves the catalog unchanged
    pub skip_unchanged_writes: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            document_key: SERVICE_CATALOG_DOCUMENT_KEY.to_string(),
            skip_unchanged_writes: false,
        }
    }
}

/// Identity the service presents to the document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    pub agent_id: String,
    pub role: AgentRole,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            agent_id: "catalog-service".to_string(),
            role: AgentRole::Writer,
        }
    }
}

impl AgentSettings {
    pub fn identity(&self) -> AgentIdentity {
        AgentIdentity::new(self.agent_id.trim(), self.role)
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub catalog: CatalogSettings,
    pub agent: AgentSettings,
}

impl CatalogConfig {
    /// Defaults with process-local storage
    pub fn in_memory() -> Self {
        Self {
            storage: StorageConfig::in_memory(),
            ..Self::default()
        }
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.catalog.document_key.trim().is_empty() {
            return Err(ApiError::ConfigError(
                "catalog.document_key cannot be empty".to_string(),
            ));
        }
        if self.agent.agent_id.trim().is_empty() {
            return Err(ApiError::ConfigError(
                "agent.agent_id cannot be empty".to_string(),
            ));
        }
        self.storage.validate()
    }
}
