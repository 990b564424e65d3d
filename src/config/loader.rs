//! Configuration Loader
//!
//! Layers configuration sources with the `config` crate: struct defaults, an optional
//! TOML file, then `WAYPOINT__`-prefixed environment overrides.

use super::error::{ConfigResult, ConfigurationError};
use super::WaypointConfig;
use crate::constants::{env, system};
use config::{Config, Environment, File, FileFormat};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Loaded, validated configuration plus where it came from
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: WaypointConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration from `WAYPOINT_CONFIG` or `config/waypoint.toml`.
    ///
    /// A missing file is not an error; defaults and environment overrides still apply.
    pub fn load() -> ConfigResult<Self> {
        let path = std::env::var(env::CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(system::DEFAULT_CONFIG_PATH));

        if path.is_file() {
            Self::load_from_file(&path)
        } else {
            debug!(path = %path.display(), "No configuration file found, using defaults");
            let builder = Config::builder().add_source(Self::environment_source());
            Self::finish(builder, None, "environment")
        }
    }

    /// Load configuration from a TOML file, with environment overrides applied on top
    pub fn load_from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::file_read_error(path.display().to_string(), e))?;

        let builder = Config::builder()
            .add_source(File::from_str(&content, FileFormat::Toml))
            .add_source(Self::environment_source());

        Self::finish(builder, Some(path.to_path_buf()), &path.display().to_string())
    }

    /// Load configuration from a TOML string without consulting the environment
    pub fn load_from_str(toml: &str) -> ConfigResult<Self> {
        let builder = Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
        Self::finish(builder, None, "inline")
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &WaypointConfig {
        &self.config
    }

    /// Path of the file the configuration was read from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn into_config(self) -> WaypointConfig {
        self.config
    }

    fn environment_source() -> Environment {
        Environment::with_prefix(env::CONFIG_PREFIX)
            .prefix_separator(env::CONFIG_SEPARATOR)
            .separator(env::CONFIG_SEPARATOR)
            .try_parsing(true)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        source: Option<PathBuf>,
        source_name: &str,
    ) -> ConfigResult<Self> {
        let config: WaypointConfig = builder
            .build()
            .and_then(|built| built.try_deserialize())
            .map_err(|e| ConfigurationError::invalid_toml(source_name, e))?;

        config.validate()?;

        info!(
            source = %source_name,
            max_attempts = ?config.scheduler.max_attempts,
            fatal_policy = ?config.scheduler.fatal_policy,
            "Configuration loaded successfully"
        );

        Ok(Self { config, source })
    }
}
