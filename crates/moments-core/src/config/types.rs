//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Vision API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Base endpoint of the Computer Vision resource (supports ${ENV_VAR} syntax)
    pub endpoint: String,

    /// Subscription key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Path of the analyze operation, appended to the endpoint
    pub api_path: String,

    /// Value of the `visualFeatures` query parameter
    pub visual_features: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            endpoint: "${AZURE_VISION_ENDPOINT}".to_string(),
            api_key: "${AZURE_VISION_KEY}".to_string(),
            api_path: "/vision/v3.1/analyze".to_string(),
            visual_features: "Tags,Description,Categories".to_string(),
            timeout_ms: 60_000,
        }
    }
}

/// What to do with a photo's existing description when new analysis arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionPolicy {
    /// Keep a non-blank description; only fill blank ones.
    #[default]
    Preserve,
    /// Always replace the description with the new caption.
    Overwrite,
}

impl std::fmt::Display for DescriptionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DescriptionPolicy::Preserve => write!(f, "preserve"),
            DescriptionPolicy::Overwrite => write!(f, "overwrite"),
        }
    }
}

/// Gallery database and discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// SQLite database file
    pub database: PathBuf,

    /// Image extensions picked up from a directory
    pub supported_formats: Vec<String>,

    /// Description overwrite policy for existing photos
    pub description_policy: DescriptionPolicy,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("~/.moments/moments.db"),
            supported_formats: vec!["jpg".to_string(), "png".to_string(), "jpeg".to_string()],
            description_policy: DescriptionPolicy::Preserve,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
