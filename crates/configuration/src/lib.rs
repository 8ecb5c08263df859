use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{AnalyticsSettings, Config, GeneratorSettings, LoggingSettings};

/// Prefix of environment overrides, e.g. `TRADEFLOW__ANALYTICS__RISK_FREE_RATE=0.0001`.
pub const ENV_PREFIX: &str = "TRADEFLOW";

const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Loads the application configuration from `config.toml` in the working directory.
///
/// The file is optional: every section has defaults, and `TRADEFLOW__*`
/// environment variables override whatever the file sets.
pub fn load_config() -> Result<Config, ConfigError> {
    build(config::File::with_name(DEFAULT_CONFIG_FILE).required(false))
}

/// Loads configuration from an explicit file, which must exist.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    build(config::File::from(path.as_ref()).required(true))
}

fn build<S>(file: S) -> Result<Config, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(?config, "Configuration loaded");
    Ok(config)
}
