//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");

    if config.changelog.directory.as_os_str().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "changelog.directory".to_string(),
            message: "directory cannot be empty".to_string(),
        }
        .into());
    }

    if config.export.output_directory.as_os_str().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "export.output_directory".to_string(),
            message: "directory cannot be empty".to_string(),
        }
        .into());
    }

    if config.export.output_directory == config.changelog.directory {
        return Err(ConfigError::InvalidValue {
            field: "export.output_directory".to_string(),
            message: "must differ from changelog.directory".to_string(),
        }
        .into());
    }

    debug!("configuration validation passed");
    Ok(())
}
