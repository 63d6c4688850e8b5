//! CLI Tooling
//!
//! Command-line front end for the catalog service. Commands are executed
//! against the configured document store and return their output as text.

use crate::accessor::{PublishOutcome, SharedDocumentAccessor};
use crate::catalog::CatalogEntry;
use crate::config::{CatalogConfig, ConfigLoader, StorageBackend};
use crate::document::{DocumentStore, InMemoryDocumentStore, SledDocumentStore};
use crate::error::ApiError;
use crate::logging::{LogFormat, LogOutput};
use crate::service::CatalogService;
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Service catalog CLI
#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Manage the shared service catalog")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<LogOutput>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply logging flags on top of the loaded configuration
    pub fn apply_logging_overrides(&self, config: &mut CatalogConfig) {
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        if let Some(output) = self.log_output {
            config.logging.output = output;
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List every catalog entry
    List {
        /// Output format (json or table)
        #[arg(long, default_value = "json")]
        format: String,
    },
    /// Show one entry as JSON
    Get { name: String },
    /// Create or replace an entry
    Put {
        name: String,
        #[arg(long, default_value = "")]
        version: String,
        #[arg(long, default_value = "")]
        github: String,
        #[arg(long, default_value = "")]
        frontend: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Create or replace an entry from a JSON object
    Submit { json: String },
    /// Remove an entry
    Delete { name: String },
    /// Print the catalog as a name to record mapping
    Records,
    /// Print the effective configuration
    Config,
}

/// CLI context holding the configured service
pub struct CliContext {
    config: CatalogConfig,
    service: CatalogService,
}

impl CliContext {
    /// Create a context from a loaded configuration, opening its document store
    pub fn new(config: CatalogConfig) -> Result<Self, ApiError> {
        let documents: Arc<dyn DocumentStore> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(InMemoryDocumentStore::new()),
            StorageBackend::Sled => {
                let path = config.storage.resolve_path()?;
                Arc::new(SledDocumentStore::open(&path)?)
            }
        };
        Ok(Self::with_documents(config, documents))
    }

    /// Load configuration (from `config_path` if given) and create a context
    pub fn load(config_path: Option<&std::path::Path>) -> Result<Self, ApiError> {
        Self::new(ConfigLoader::load_or_default(config_path)?)
    }

    /// Create a context over an existing document store
    pub fn with_documents(config: CatalogConfig, documents: Arc<dyn DocumentStore>) -> Self {
        let accessor = SharedDocumentAccessor::new(documents, config.agent.identity())
            .with_key(config.catalog.document_key.trim())
            .with_skip_unchanged_writes(config.catalog.skip_unchanged_writes);
        Self {
            config,
            service: CatalogService::new(accessor),
        }
    }

    pub fn service(&self) -> &CatalogService {
        &self.service
    }

    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::List { format } => match format.as_str() {
                "json" => self.service.list_catalog(),
                "table" => self.format_table(),
                other => Err(ApiError::InvalidArgument(format!(
                    "format {} (must be 'json' or 'table')",
                    other
                ))),
            },
            Commands::Get { name } => match self.service.get_entry(name)? {
                Some(entry) => Ok(serde_json::to_string_pretty(&entry.to_json_value())?),
                None => Err(ApiError::EntryNotFound {
                    name: name.trim().to_string(),
                }),
            },
            Commands::Put {
                name,
                version,
                github,
                frontend,
                description,
            } => {
                let outcome =
                    self.service
                        .upsert_entry(name, version, github, frontend, description)?;
                Ok(describe_outcome("Catalog updated.", outcome))
            }
            Commands::Submit { json } => {
                let outcome = self.service.post_entry_json(json)?;
                Ok(describe_outcome("Catalog updated.", outcome))
            }
            Commands::Delete { name } => {
                let outcome = self.service.delete_entry(name)?;
                Ok(describe_outcome("Catalog updated.", outcome))
            }
            Commands::Records => {
                let records = self.service.catalog_as_record_map()?;
                Ok(serde_json::to_string_pretty(&records)?)
            }
            Commands::Config => toml::to_string_pretty(&self.config).map_err(|e| {
                ApiError::ConfigError(format!("Failed to render configuration: {}", e))
            }),
        }
    }

    fn format_table(&self) -> Result<String, ApiError> {
        let catalog = self.service.accessor().load_catalog()?;
        let mut entries: Vec<&CatalogEntry> = catalog.entries().collect();
        entries.sort_by(|a, b| a.name().cmp(b.name()));
        info!(entries = entries.len(), "Rendering catalog table");

        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Name", "Version", "GitHub", "Frontend", "Description"]);
        for entry in entries {
            table.add_row(vec![
                entry.name(),
                entry.version(),
                entry.github(),
                entry.frontend(),
                entry.description(),
            ]);
        }
        Ok(table.to_string())
    }
}

fn describe_outcome(message: &str, outcome: PublishOutcome) -> String {
    match outcome {
        PublishOutcome::Unchanged => format!("{} (no changes)", message),
        PublishOutcome::Created | PublishOutcome::Replaced => message.to_string(),
    }
}
