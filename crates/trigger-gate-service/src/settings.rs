//! Configuration loading for the service binary.
//!
//! Sources, later ones overriding earlier ones:
//!
//! 1. `/etc/trigger-gate/service.yaml`
//! 2. `./config/service.yaml`
//! 3. The file named by `TG_CONFIG_FILE`, which must exist when set
//! 4. Environment variables such as `TG__SERVER__PORT=9090`
//!
//! Every field has a default, so a missing file is not an error. A file that
//! does not parse, or a value of the wrong type, is.

use config::{Config, Environment, File, FileFormat};
use std::path::PathBuf;
use tracing::info;
use trigger_gate_api::ServiceConfig;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_FILE_ENV: &str = "TG_CONFIG_FILE";

/// Prefix of configuration override variables.
pub const ENV_PREFIX: &str = "TG";

const SYSTEM_CONFIG: &str = "/etc/trigger-gate/service";
const LOCAL_CONFIG: &str = "config/service";

/// Failure to produce a usable [`ServiceConfig`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] trigger_gate_api::ConfigError),
}

/// Files consulted by [`load_config_from`].
#[derive(Debug, Clone)]
pub struct ConfigSources {
    /// Optional base files, in override order
    pub defaults: Vec<PathBuf>,

    /// Operator supplied file; must exist
    pub explicit: Option<PathBuf>,
}

impl ConfigSources {
    /// The standard locations plus `TG_CONFIG_FILE` when set and non-empty.
    pub fn standard() -> Self {
        let explicit = std::env::var(CONFIG_FILE_ENV)
            .ok()
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        Self {
            defaults: vec![PathBuf::from(SYSTEM_CONFIG), PathBuf::from(LOCAL_CONFIG)],
            explicit,
        }
    }
}

/// Load and validate the configuration from the standard sources.
pub fn load_config() -> Result<ServiceConfig, SettingsError> {
    load_config_from(&ConfigSources::standard())
}

/// Load and validate the configuration from `sources` and the environment.
pub fn load_config_from(sources: &ConfigSources) -> Result<ServiceConfig, SettingsError> {
    let mut builder = Config::builder();

    for path in &sources.defaults {
        builder = builder.add_source(
            File::from(path.as_path())
                .format(FileFormat::Yaml)
                .required(false),
        );
    }

    if let Some(path) = &sources.explicit {
        info!(path = %path.display(), "Loading configuration from explicit path");
        builder = builder.add_source(
            File::from(path.as_path())
                .format(FileFormat::Yaml)
                .required(true),
        );
    }

    let config: ServiceConfig = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?
        .try_deserialize()?;

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
