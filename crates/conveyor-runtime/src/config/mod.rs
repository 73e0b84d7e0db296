//! Configuration module for the Conveyor runtime.
//!
//! TOML-based configuration loading and validation for logging and the
//! blocking worker pool.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, load_config, load_config_from_file};
pub use schema::{ConveyorConfig, LogFormat, LogLevel, LogOutput, LoggingConfig, PoolConfig};
pub use validation::validate_config;
