//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.vision.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "vision.timeout_ms must be > 0".into(),
            ));
        }
        if !self.vision.api_path.starts_with('/') {
            return Err(ConfigError::ValidationError(
                "vision.api_path must start with '/'".into(),
            ));
        }
        if self.gallery.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "gallery.supported_formats must list at least one extension".into(),
            ));
        }
        if self.gallery.database.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "gallery.database must not be empty".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        Ok(())
    }
}
