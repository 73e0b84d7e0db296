//! Configuration loader using figment.
//!
//! Sources are layered, later ones overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. Configuration file (`conveyor.toml` / `config.toml`, or an explicit
//!    path)
//! 3. Environment variables (`CONVEYOR_*`, `__` as the nesting separator,
//!    e.g. `CONVEYOR_POOL__MAX_WORKERS=16`)
//! 4. Programmatic overrides via [`ConfigLoader::merge`]
//!
//! # Example
//!
//! ```rust,ignore
//! use conveyor_runtime::config::ConfigLoader;
//!
//! // Default locations plus CONVEYOR_* env overrides
//! let config = ConfigLoader::new().load()?;
//!
//! // Explicit file
//! let config = ConfigLoader::new().file("config/conveyor.toml").load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::ConveyorConfig;
use super::validation::validate_config;

/// File names searched when no explicit file is given.
const CONFIG_FILE_NAMES: &[&str] = &["conveyor.toml", "config.toml"];

/// Configuration loader with figment-based multi-source support.
pub struct ConfigLoader {
    /// Programmatic overrides, merged last.
    figment: Figment,
    /// Search paths for configuration files.
    search_paths: Vec<PathBuf>,
    /// Whether to load environment variables.
    load_env: bool,
    /// Specific config file to load (overrides search).
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a new configuration loader with defaults.
    pub fn new() -> Self {
        Self {
            figment: Figment::new(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Adds the current directory to search paths.
    pub fn with_current_dir(self) -> Self {
        if let Ok(cwd) = std::env::current_dir() {
            self.search_path(cwd)
        } else {
            self
        }
    }

    /// Sets a specific configuration file to load.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Merges additional configuration programmatically.
    pub fn merge(mut self, config: ConveyorConfig) -> Self {
        self.figment = self.figment.merge(Serialized::defaults(config));
        self
    }

    /// Loads, validates, and returns the configuration.
    pub fn load(self) -> ConfigResult<ConveyorConfig> {
        let figment = self.build_figment()?;

        let config: ConveyorConfig = figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        validate_config(&config)?;

        debug!(
            logging_level = %config.logging.level,
            pool_max_workers = config.pool.max_workers,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Builds the figment instance with all sources.
    fn build_figment(self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(ConveyorConfig::default()));

        if let Some(path) = &self.config_file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
            info!(path = %path.display(), "Loading configuration file");
            figment = figment.merge(Toml::file(path));
        } else {
            figment = self.search_config_files(figment);
        }

        if self.load_env {
            trace!("Loading environment variables with CONVEYOR_ prefix");
            figment = figment.merge(Env::prefixed("CONVEYOR_").split("__"));
        }

        // Programmatic overrides win
        figment = figment.merge(self.figment);

        Ok(figment)
    }

    /// Searches for and loads configuration files from the search paths.
    fn search_config_files(&self, figment: Figment) -> Figment {
        let search_paths = if self.search_paths.is_empty() {
            std::env::current_dir().into_iter().collect()
        } else {
            self.search_paths.clone()
        };

        for search_path in &search_paths {
            for name in CONFIG_FILE_NAMES {
                let path = search_path.join(name);
                if path.exists() {
                    info!(path = %path.display(), "Loading configuration file");
                    return figment.merge(Toml::file(path));
                }
            }
        }

        warn!("No configuration file found, using defaults");
        figment
    }
}

/// Loads configuration from default locations.
pub fn load_config() -> ConfigResult<ConveyorConfig> {
    ConfigLoader::new().with_current_dir().load()
}

/// Loads configuration from a specific file.
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<ConveyorConfig> {
    ConfigLoader::new().file(path).load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{LogLevel, PoolConfig};

    #[test]
    fn default_load_without_sources() {
        let config = ConfigLoader::new().without_env().load().unwrap();

        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.pool.max_workers, 8);
    }

    #[test]
    fn programmatic_overrides_win() {
        let config = ConfigLoader::new()
            .without_env()
            .merge(ConveyorConfig {
                pool: PoolConfig { max_workers: 2 },
                ..Default::default()
            })
            .load()
            .unwrap();

        assert_eq!(config.pool.max_workers, 2);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = ConfigLoader::new()
            .without_env()
            .file("/definitely/not/here/conveyor.toml")
            .load()
            .unwrap_err();

        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
