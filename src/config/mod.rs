mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, path::Path};
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    let config = load_from(&config_path).await?;
    apply_overrides(config, |key| env::var(key).ok())
}

/// Reads a YAML config file. A missing file yields the defaults.
pub async fn load_from(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();

    if !tokio::fs::try_exists(path).await? {
        debug!("No configuration file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    debug!("Loading configuration from: {}", path.display());

    let config_str = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

/// Applies `PORT` and `PROVIDER_TIMEOUT_SECS` on top of a loaded config.
pub fn apply_overrides<F>(mut config: Config, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        config.server.port = port
            .parse()
            .map_err(|_| Error::config(format!("Invalid PORT value: '{}'", port)))?;
    }

    if let Some(timeout) = lookup("PROVIDER_TIMEOUT_SECS") {
        config.provider.timeout_secs = timeout.parse().map_err(|_| {
            Error::config(format!("Invalid PROVIDER_TIMEOUT_SECS value: '{}'", timeout))
        })?;
    }

    if config.provider.timeout_secs == 0 {
        return Err(Error::config("provider.timeout_secs must be greater than zero"));
    }

    Ok(config)
}
