//! Environment variable source: CATALOG__* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub const ENV_PREFIX: &str = "CATALOG";

/// Add environment variable overlay to builder.
///
/// `CATALOG__STORAGE__BACKEND=sled` sets `storage.backend`.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    )
}
