//! Configuration validation.

use super::error::{ConfigError, ConfigResult};
use super::schema::{ConveyorConfig, LogOutput};

/// Validates a loaded configuration.
///
/// Called by [`ConfigLoader::load`](super::ConfigLoader::load); exposed for
/// callers that assemble a [`ConveyorConfig`] by hand.
pub fn validate_config(config: &ConveyorConfig) -> ConfigResult<()> {
    if config.pool.max_workers == 0 {
        return Err(ConfigError::validation("pool.max_workers must be at least 1"));
    }

    if config.logging.output == LogOutput::File && config.logging.file_path.is_none() {
        return Err(ConfigError::validation(
            "logging.file_path is required when logging.output is 'file'",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{LoggingConfig, PoolConfig};

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ConveyorConfig::default()).is_ok());
    }

    #[test]
    fn zero_workers_is_rejected() {
        let config = ConveyorConfig {
            pool: PoolConfig { max_workers: 0 },
            ..Default::default()
        };

        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn file_output_requires_a_path() {
        let config = ConveyorConfig {
            logging: LoggingConfig {
                output: LogOutput::File,
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(validate_config(&config).is_err());
    }
}
