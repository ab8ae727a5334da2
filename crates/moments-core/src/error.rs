//! Error types for Moments.
//!
//! Errors are split by concern (configuration, vision API, gallery store) so
//! messages carry the context a user needs to act on them.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Moments operations.
#[derive(Error, Debug)]
pub enum MomentsError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Vision API errors
    #[error("Vision error: {0}")]
    Vision(#[from] VisionError),

    /// Gallery database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to read an image from disk
    #[error("Failed to read {path}: {source}")]
    ImageRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to list an image directory
    #[error("Failed to list {path}: {source}")]
    Discovery {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while talking to the vision API.
///
/// A non-success HTTP status is not an error: the client degrades to the
/// "no data" analysis instead. These variants cover everything else.
#[derive(Error, Debug)]
pub enum VisionError {
    /// Endpoint or API key could not be resolved
    #[error("{0} not set. Set it in the config file or the environment.")]
    MissingCredential(String),

    /// Transport failure (connection, DNS, TLS, timeout)
    #[error("Vision request failed: {message}")]
    Request {
        message: String,
        status_code: Option<u16>,
    },

    /// Response body was not the expected JSON
    #[error("Failed to parse vision response: {0}")]
    Decode(String),
}

/// Convenience type alias for Moments results.
pub type Result<T> = std::result::Result<T, MomentsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_message_names_the_setting() {
        let err = VisionError::MissingCredential("AZURE_VISION_KEY".to_string());
        assert!(err.to_string().contains("AZURE_VISION_KEY"));
    }

    #[test]
    fn test_vision_error_wraps_into_moments_error() {
        let err: MomentsError = VisionError::Decode("expected value".to_string()).into();
        assert!(matches!(err, MomentsError::Vision(VisionError::Decode(_))));
        assert!(err.to_string().starts_with("Vision error"));
    }

    #[test]
    fn test_image_read_error_includes_path() {
        let err = MomentsError::ImageRead {
            path: PathBuf::from("/photos/beach.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/photos/beach.jpg"));
    }
}
