use config::{Config, Environment, File};
use cpool_cipher::{CipherError, PoolSettings};
use std::borrow::Cow;
use std::path::Path;
use tracing::info;

/// Settings file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_NAME: &str = "cipherpool";
/// Prefix of environment overrides, e.g. `CPOOL__POOL_SIZE=20`.
pub const ENV_PREFIX: &str = "CPOOL";

#[cpool_derive::cpool_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("Invalid settings{}: {source}", format_context(.context))]
    Invalid { source: CipherError, context: Option<Cow<'static, str>> },
}

/// Loads [`PoolSettings`] from a settings file overlaid with `CPOOL__*` environment
/// variables.
///
/// Only `pool_size` and `replenish_interval_ms` are taken from these sources; key
/// derivation parameters stay fixed. An explicit `path` must exist. Without one, `cipherpool.{toml,json,yaml,..}` in
/// the working directory is used if present. Missing fields keep their defaults.
///
/// # Errors
/// * [`ConfigError::Config`] if the file is missing or malformed, or a value has the
///   wrong type.
/// * [`ConfigError::Invalid`] if the merged settings fail validation.
pub fn load_settings(path: Option<&Path>) -> Result<PoolSettings, ConfigError> {
    let file = match path {
        Some(path) => {
            info!("Loading settings from {}", path.display());
            File::from(path).required(true)
        },
        None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let settings = Config::builder()
        .add_source(file)
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .context("Failed to build settings")?
        .try_deserialize::<PoolSettings>()
        .context("Failed to deserialize settings")?;

    settings.validate().context("Settings rejected")?;
    Ok(settings)
}
