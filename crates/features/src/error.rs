//! Error types for the feature compiler
//!
//! ## Table of Contents
//! 1. FeatureError - Main error enum

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the compiler's collaborators (config, cursors, reprojection).
///
/// Missing inputs and insufficient symbology are not errors; they are reported
/// through [`crate::diagnostics::Diagnostics`] and yield an empty result.
#[derive(Error, Debug)]
pub enum FeatureError {
    /// File I/O error
    #[error("Failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    /// TOML parse error
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// GeoJSON parse or structure error
    #[error("GeoJSON error: {0}")]
    GeoJson(String),

    /// SRS string not recognised
    #[error("Unknown spatial reference: {0}")]
    UnknownSrs(String),

    /// Coordinate could not be expressed in the target SRS
    #[error("Cannot reproject from {from} to {to}: {reason}")]
    Reprojection {
        from: &'static str,
        to: &'static str,
        reason: String,
    },

    /// Extent is degenerate or cannot be transformed
    #[error("Invalid extent: {0}")]
    InvalidExtent(String),

    /// Named style missing from the configuration
    #[error("Style not found: {0}")]
    UnknownStyle(String),
}

impl From<geojson::Error> for FeatureError {
    fn from(err: geojson::Error) -> Self {
        FeatureError::GeoJson(err.to_string())
    }
}

/// Result type for feature compiler operations
pub type Result<T> = std::result::Result<T, FeatureError>;
