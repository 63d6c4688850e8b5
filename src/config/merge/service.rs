//! MergeService: orchestrates sources, applies precedence, deserializes to CatalogConfig.

use crate::config::sources::{environment, file};
use crate::config::CatalogConfig;
use crate::types::SERVICE_CATALOG_DOCUMENT_KEY;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};
use std::path::Path;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from standard sources.
    /// Precedence: defaults (lowest) -> global file -> environment (highest).
    pub fn load() -> Result<CatalogConfig, ConfigError> {
        let builder = Self::builder_with_defaults()?;
        let builder = file::add_global_to_builder(builder);
        let builder = environment::add_to_builder(builder);

        builder.build()?.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<CatalogConfig, ConfigError> {
        let builder = Self::builder_with_defaults()?;
        let builder = file::add_path_to_builder(builder, path);
        let builder = environment::add_to_builder(builder);

        builder.build()?.try_deserialize()
    }

    fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("catalog.document_key", SERVICE_CATALOG_DOCUMENT_KEY)?
            .set_default("catalog.skip_unchanged_writes", false)?
            .set_default("storage.backend", "sled")?
            .set_default("agent.agent_id", "catalog-service")?
            .set_default("agent.role", "writer")
    }
}
