//! Logging System
//!
//! Structured logging through `tracing`. Level, format and destination come
//! from `LoggingConfig`; `CATALOG_LOG`, `CATALOG_LOG_FORMAT`, `CATALOG_LOG_OUTPUT`
//! and `CATALOG_LOG_FILE` override it at startup.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::layer::Layered;
use tracing_subscriber::{
    fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

const LOG_FILE_NAME: &str = "catalog.log";

/// Line format of emitted events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}' (text, json)", other)),
        }
    }
}

/// Where events are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    #[default]
    Stderr,
    File,
    #[serde(rename = "file+stderr")]
    FileAndStderr,
    /// stdout and stderr
    Both,
}

impl LogOutput {
    fn writes_file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::FileAndStderr)
    }
}

impl FromStr for LogOutput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "stdout" => Ok(LogOutput::Stdout),
            "stderr" => Ok(LogOutput::Stderr),
            "file" => Ok(LogOutput::File),
            "file+stderr" => Ok(LogOutput::FileAndStderr),
            "both" => Ok(LogOutput::Both),
            other => Err(format!(
                "unknown log output '{}' (stdout, stderr, file, file+stderr, both)",
                other
            )),
        }
    }
}

impl fmt::Display for LogOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogOutput::Stdout => "stdout",
            LogOutput::Stderr => "stderr",
            LogOutput::File => "file",
            LogOutput::FileAndStderr => "file+stderr",
            LogOutput::Both => "both",
        };
        f.write_str(name)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,

    /// Filter directive for everything, e.g. `info` or `warn`
    pub level: String,

    pub format: LogFormat,

    pub output: LogOutput,

    /// Log file when `output` includes a file; None means the state directory
    pub file: Option<PathBuf>,

    /// ANSI colours for text written to a terminal
    pub color: bool,

    /// Per-target levels, e.g. `service_catalog::accessor = "debug"`
    pub modules: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Text,
            output: LogOutput::Stderr,
            file: None,
            color: true,
            modules: HashMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Apply `CATALOG_LOG_FORMAT`, `CATALOG_LOG_OUTPUT` and `CATALOG_LOG_FILE`
    pub fn with_env_overrides(mut self) -> Result<Self, ApiError> {
        if let Some(format) = non_empty_env("CATALOG_LOG_FORMAT") {
            self.format = format.parse().map_err(ApiError::ConfigError)?;
        }
        if let Some(output) = non_empty_env("CATALOG_LOG_OUTPUT") {
            self.output = output.parse().map_err(ApiError::ConfigError)?;
        }
        if let Some(file) = non_empty_env("CATALOG_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        Ok(self)
    }

    /// Log file to append to, falling back to the platform state directory
    pub fn log_file_path(&self) -> Result<PathBuf, ApiError> {
        match &self.file {
            Some(path) if !path.as_os_str().is_empty() => Ok(path.clone()),
            _ => default_log_file_path(),
        }
    }

    fn env_filter(&self) -> Result<EnvFilter, ApiError> {
        if let Ok(filter) = EnvFilter::try_from_env("CATALOG_LOG") {
            return Ok(filter);
        }

        let mut filter = EnvFilter::try_new(&self.level).map_err(|e| {
            ApiError::ConfigError(format!("Invalid log level '{}': {}", self.level, e))
        })?;
        for (target, level) in &self.modules {
            let directive = format!("{}={}", target, level)
                .parse::<Directive>()
                .map_err(|e| {
                    ApiError::ConfigError(format!("Invalid log level for {}: {}", target, e))
                })?;
            filter = filter.add_directive(directive);
        }
        Ok(filter)
    }

    fn make_writer(&self) -> Result<BoxMakeWriter, ApiError> {
        let writer = match self.output {
            LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
            LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
            LogOutput::Both => BoxMakeWriter::new(std::io::stdout.and(std::io::stderr)),
            LogOutput::File => BoxMakeWriter::new(Arc::new(open_log_file(&self.log_file_path()?)?)),
            LogOutput::FileAndStderr => {
                let file = Arc::new(open_log_file(&self.log_file_path()?)?);
                BoxMakeWriter::new(file.and(std::io::stderr))
            }
        };
        Ok(writer)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn default_log_file_path() -> Result<PathBuf, ApiError> {
    let project_dirs = directories::ProjectDirs::from("", "service-catalog", "service-catalog")
        .ok_or_else(|| {
            ApiError::ConfigError("Could not determine a state directory for the log file".to_string())
        })?;
    let dir = project_dirs
        .state_dir()
        .unwrap_or_else(|| project_dirs.data_local_dir());
    Ok(dir.join(LOG_FILE_NAME))
}

fn open_log_file(path: &Path) -> Result<File, ApiError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ApiError::ConfigError(format!("Failed to create log directory: {}", e))
        })?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ApiError::ConfigError(format!("Failed to open log file {}: {}", path.display(), e)))
}

type FilteredRegistry = Layered<EnvFilter, Registry>;

/// Install the global subscriber.
///
/// Environment overrides win over `config`; `None` means defaults.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ApiError> {
    let config = config.cloned().unwrap_or_default().with_env_overrides()?;

    let filter = if config.enabled {
        config.env_filter()?
    } else {
        EnvFilter::new("off")
    };
    let use_color = config.color && !config.output.writes_file();
    let writer = config.make_writer()?;

    let layer: Box<dyn Layer<FilteredRegistry> + Send + Sync> = match config.format {
        LogFormat::Json => tracing_fmt::layer()
            .json()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(writer)
            .boxed(),
        LogFormat::Text => tracing_fmt::layer()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(use_color)
            .with_writer(writer)
            .boxed(),
    };

    Registry::default()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| ApiError::ConfigError(format!("Failed to install logger: {}", e)))
}
