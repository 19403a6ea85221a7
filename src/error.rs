//! Error types for layout setup
//!
//! Layout passes never fail on content; these errors only come out of
//! configuration loading and validation, before any paragraph is laid out.

use thiserror::Error;

/// Setup-time failure
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A font in the configuration cannot be measured with
    #[error("Invalid {role} font: {reason}")]
    InvalidFont { role: &'static str, reason: String },

    /// Geometry or spacing values are inconsistent
    #[error("Invalid layout configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
