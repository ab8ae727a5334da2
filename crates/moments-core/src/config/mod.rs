//! Configuration management for Moments.
//!
//! Configuration is loaded from the platform config directory with defaults
//! for every field. Credentials default to `${AZURE_VISION_*}` references that
//! resolve from the environment at use time.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Moments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Vision API settings
    pub vision: VisionConfig,

    /// Gallery database settings
    pub gallery: GalleryConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// - macOS: ~/Library/Application Support/com.moments.moments/config.toml
    /// - Linux: ~/.config/moments/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\moments\config\config.toml
    ///
    /// Falls back to ~/.moments/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "moments", "moments")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".moments").join("config.toml")
            })
    }

    /// Get the resolved database path (with ~ expansion).
    pub fn database_path(&self) -> PathBuf {
        let path_str = self.gallery.database.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Resolve `${ENV_VAR}` references in config strings.
///
/// Plain strings pass through; empty strings and unset variables yield `None`.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.vision.api_path, "/vision/v3.1/analyze");
        assert_eq!(config.vision.visual_features, "Tags,Description,Categories");
        assert_eq!(config.gallery.supported_formats, vec!["jpg", "png", "jpeg"]);
        assert_eq!(
            config.gallery.description_policy,
            DescriptionPolicy::Preserve
        );
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[vision]"));
        assert!(toml.contains("[gallery]"));
        assert!(toml.contains("description_policy = \"preserve\""));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[gallery]\ndescription_policy = \"overwrite\"\n\n[vision]\napi_key = \"abc\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config.gallery.description_policy,
            DescriptionPolicy::Overwrite
        );
        assert_eq!(config.vision.api_key, "abc");
        assert_eq!(config.vision.endpoint, "${AZURE_VISION_ENDPOINT}");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_rejects_unknown_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[gallery]\ndescription_policy = \"sometimes\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_database_path_expands_tilde() {
        let config = Config::default();
        let path = config.database_path();
        assert!(path.ends_with(".moments/moments.db"));
    }

    #[test]
    fn test_database_path_absolute_is_unchanged() {
        let mut config = Config::default();
        config.gallery.database = PathBuf::from("/var/lib/moments/gallery.db");
        assert_eq!(
            config.database_path(),
            PathBuf::from("/var/lib/moments/gallery.db")
        );
    }

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }
}
