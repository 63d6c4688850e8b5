//! TOML file sources: the global config file and explicit `--config` paths.

use crate::config::paths;
use config::builder::DefaultState;
use config::{ConfigBuilder, File, FileFormat};
use std::path::Path;

/// Add the global config file, if one exists
pub fn add_global_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    match paths::global_config_file() {
        Some(path) => builder.add_source(
            File::from(path)
                .format(FileFormat::Toml)
                .required(false),
        ),
        None => builder,
    }
}

/// Add an explicit config file; it must exist
pub fn add_path_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        File::from(path)
            .format(FileFormat::Toml)
            .required(true),
    )
}
